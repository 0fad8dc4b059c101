use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::value::StateValue;

/// One entry of the choice audit trail. Persisted as `[scene_id, index, text]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(String, usize, String)", into = "(String, usize, String)")]
pub struct ChoiceRecord {
    pub scene_id: String,
    pub choice_index: usize,
    pub choice_text: String,
}

impl From<(String, usize, String)> for ChoiceRecord {
    fn from((scene_id, choice_index, choice_text): (String, usize, String)) -> Self {
        Self {
            scene_id,
            choice_index,
            choice_text,
        }
    }
}

impl From<ChoiceRecord> for (String, usize, String) {
    fn from(record: ChoiceRecord) -> Self {
        (record.scene_id, record.choice_index, record.choice_text)
    }
}

/// Serialized form of [`GameState`], the `game_state` object of a save record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub current_scene: String,
    pub visited_scenes: Vec<String>,
    pub flags: BTreeMap<String, bool>,
    #[serde(default)]
    pub inventory: Vec<String>,
    #[serde(default)]
    pub variables: BTreeMap<String, StateValue>,
    #[serde(default)]
    pub choice_history: Vec<ChoiceRecord>,
    #[serde(default)]
    pub playtime: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub story_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub story_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_scenes: Option<usize>,
}

impl GameStateSnapshot {
    pub fn with_story_context(
        mut self,
        story_id: impl Into<String>,
        story_title: impl Into<String>,
        total_scenes: usize,
    ) -> Self {
        self.story_id = Some(story_id.into());
        self.story_title = Some(story_title.into());
        self.total_scenes = Some(total_scenes);
        self
    }
}

/// Mutable progress of one play session.
#[derive(Debug, Clone, Default)]
pub struct GameState {
    current_scene: String,
    visited_scenes: Vec<String>,
    flags: BTreeMap<String, bool>,
    inventory: Vec<String>,
    variables: BTreeMap<String, StateValue>,
    choice_history: Vec<ChoiceRecord>,
    playtime: f64,
    checkpoint: Option<Instant>,
}

impl GameState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_scene(&self) -> &str {
        &self.current_scene
    }

    pub fn visited_scenes(&self) -> &[String] {
        &self.visited_scenes
    }

    pub fn flags(&self) -> &BTreeMap<String, bool> {
        &self.flags
    }

    pub fn inventory(&self) -> &[String] {
        &self.inventory
    }

    pub fn variables(&self) -> &BTreeMap<String, StateValue> {
        &self.variables
    }

    pub fn choice_history(&self) -> &[ChoiceRecord] {
        &self.choice_history
    }

    /// Playtime as of the last checkpoint.
    pub fn playtime(&self) -> f64 {
        self.playtime
    }

    pub fn set_flag(&mut self, flag: &str, value: bool) {
        self.flags.insert(flag.to_string(), value);
    }

    pub fn clear_flag(&mut self, flag: &str) {
        self.flags.remove(flag);
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.get(flag).copied().unwrap_or(false)
    }

    pub fn add_item(&mut self, item: &str) {
        if !self.has_item(item) {
            self.inventory.push(item.to_string());
        }
    }

    pub fn remove_item(&mut self, item: &str) -> bool {
        let before = self.inventory.len();
        self.inventory.retain(|entry| entry != item);
        self.inventory.len() != before
    }

    pub fn has_item(&self, item: &str) -> bool {
        self.inventory.iter().any(|entry| entry == item)
    }

    pub fn set_variable(&mut self, name: &str, value: StateValue) {
        self.variables.insert(name.to_string(), value);
    }

    pub fn variable(&self, name: &str) -> Option<&StateValue> {
        self.variables.get(name)
    }

    pub fn visit_scene(&mut self, scene_id: &str) {
        if !self.has_visited(scene_id) {
            self.visited_scenes.push(scene_id.to_string());
        }
        self.current_scene = scene_id.to_string();
    }

    pub fn has_visited(&self, scene_id: &str) -> bool {
        self.visited_scenes.iter().any(|entry| entry == scene_id)
    }

    pub fn record_choice(&mut self, scene_id: &str, choice_index: usize, choice_text: &str) {
        self.choice_history.push(ChoiceRecord {
            scene_id: scene_id.to_string(),
            choice_index,
            choice_text: choice_text.to_string(),
        });
    }

    /// Stamps the session start. Playtime only accumulates after this.
    pub fn start_session(&mut self) {
        self.start_session_at(Instant::now());
    }

    pub fn start_session_at(&mut self, now: Instant) {
        self.checkpoint = Some(now);
    }

    pub fn session_started(&self) -> bool {
        self.checkpoint.is_some()
    }

    pub fn accumulate_playtime(&mut self) {
        self.accumulate_playtime_at(Instant::now());
    }

    pub fn accumulate_playtime_at(&mut self, now: Instant) {
        let Some(checkpoint) = self.checkpoint else {
            return;
        };
        let elapsed: Duration = now.saturating_duration_since(checkpoint);
        self.playtime += elapsed.as_secs_f64();
        self.checkpoint = Some(now);
    }

    pub fn to_snapshot(&self) -> GameStateSnapshot {
        GameStateSnapshot {
            current_scene: self.current_scene.clone(),
            visited_scenes: self.visited_scenes.clone(),
            flags: self.flags.clone(),
            inventory: self.inventory.clone(),
            variables: self.variables.clone(),
            choice_history: self.choice_history.clone(),
            playtime: self.playtime,
            story_id: None,
            story_title: None,
            total_scenes: None,
        }
    }

    /// Folds elapsed time into playtime, then snapshots. Use for anything persisted.
    pub fn checkpoint_snapshot(&mut self) -> GameStateSnapshot {
        self.accumulate_playtime();
        self.to_snapshot()
    }

    pub fn from_snapshot(snapshot: GameStateSnapshot) -> Self {
        Self::from_snapshot_at(snapshot, Instant::now())
    }

    pub fn from_snapshot_at(snapshot: GameStateSnapshot, now: Instant) -> Self {
        Self {
            current_scene: snapshot.current_scene,
            visited_scenes: dedup_preserving_order(snapshot.visited_scenes),
            flags: snapshot.flags,
            inventory: dedup_preserving_order(snapshot.inventory),
            variables: snapshot.variables,
            choice_history: snapshot.choice_history,
            playtime: snapshot.playtime,
            checkpoint: Some(now),
        }
    }
}

fn dedup_preserving_order(values: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(values.len());
    for value in values {
        if !out.contains(&value) {
            out.push(value);
        }
    }
    out
}

#[cfg(test)]
mod state_tests {
    use super::*;

    #[test]
    fn visit_scene_on_fresh_state_sets_current_and_visited() {
        let mut state = GameState::new();
        state.visit_scene("opening");
        assert_eq!(state.visited_scenes(), ["opening".to_string()]);
        assert_eq!(state.current_scene(), "opening");
    }

    #[test]
    fn visit_scene_is_idempotent_and_keeps_first_visit_order() {
        let mut state = GameState::new();
        state.visit_scene("s1");
        state.visit_scene("s2");
        state.visit_scene("s1");
        assert_eq!(state.visited_scenes(), ["s1".to_string(), "s2".to_string()]);
        assert_eq!(state.current_scene(), "s1");
    }

    #[test]
    fn add_item_twice_keeps_a_single_entry() {
        let mut state = GameState::new();
        state.add_item("key");
        state.add_item("key");
        assert_eq!(state.inventory(), ["key".to_string()]);
        assert!(state.has_item("key"));
        assert!(state.remove_item("key"));
        assert!(!state.remove_item("key"));
    }

    #[test]
    fn flags_default_to_false() {
        let mut state = GameState::new();
        assert!(!state.has_flag("called_eddie"));
        state.set_flag("called_eddie", true);
        assert!(state.has_flag("called_eddie"));
        state.set_flag("called_eddie", false);
        assert!(!state.has_flag("called_eddie"));
    }

    #[test]
    fn record_choice_always_appends() {
        let mut state = GameState::new();
        state.record_choice("opening", 0, "Search the body");
        state.record_choice("opening", 0, "Search the body");
        assert_eq!(state.choice_history().len(), 2);
    }

    #[test]
    fn playtime_accumulates_only_after_session_start() {
        let base = Instant::now();
        let mut state = GameState::new();
        state.accumulate_playtime_at(base + Duration::from_secs(5));
        assert_eq!(state.playtime(), 0.0);

        state.start_session_at(base);
        state.accumulate_playtime_at(base + Duration::from_secs(3));
        state.accumulate_playtime_at(base + Duration::from_secs(5));
        assert!((state.playtime() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn snapshot_roundtrip_keeps_fields_and_resets_checkpoint() {
        let base = Instant::now();
        let mut state = GameState::new();
        state.start_session_at(base);
        state.visit_scene("opening");
        state.visit_scene("check_gun");
        state.set_flag("examined_gun", true);
        state.add_item("Revolver");
        state.set_variable("bullets", StateValue::Int(6));
        state.record_choice("opening", 1, "Check your own gun");
        state.accumulate_playtime_at(base + Duration::from_secs(10));

        let snapshot = state.to_snapshot();
        let resumed_at = base + Duration::from_secs(100);
        let mut restored = GameState::from_snapshot_at(snapshot.clone(), resumed_at);
        assert_eq!(restored.to_snapshot(), snapshot);

        restored.accumulate_playtime_at(resumed_at + Duration::from_secs(2));
        assert!((restored.playtime() - 12.0).abs() < 1e-9);
    }

    #[test]
    fn snapshot_json_uses_save_file_keys() {
        let mut state = GameState::new();
        state.visit_scene("opening");
        state.record_choice("opening", 2, "Run.");
        let json = serde_json::to_value(
            state
                .to_snapshot()
                .with_story_context("the_last_case", "THE LAST CASE", 12),
        )
        .expect("snapshot should serialize");
        assert_eq!(json["current_scene"], "opening");
        assert_eq!(json["choice_history"][0][1], 2);
        assert_eq!(json["choice_history"][0][2], "Run.");
        assert_eq!(json["total_scenes"], 12);
        assert!(json.get("playtime").is_some());
    }

    #[test]
    fn snapshot_parse_defaults_optional_fields() {
        let snapshot: GameStateSnapshot = serde_json::from_str(
            r#"{"current_scene":"a","visited_scenes":["a","a"],"flags":{"x":true}}"#,
        )
        .expect("minimal snapshot should parse");
        assert!(snapshot.inventory.is_empty());
        assert_eq!(snapshot.playtime, 0.0);
        let state = GameState::from_snapshot(snapshot);
        assert_eq!(state.visited_scenes(), ["a".to_string()]);
        assert!(state.session_started());
    }
}
