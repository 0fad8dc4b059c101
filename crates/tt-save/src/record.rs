use serde::{Deserialize, Serialize};
use serde_json::Value;
use tt_core::GameStateSnapshot;

const METADATA_KEYS: [&str; 4] = ["slot", "timestamp", "game_version", "current_scene"];
const GAME_STATE_KEYS: [&str; 3] = ["current_scene", "visited_scenes", "flags"];

/// Derived summary of a save. Recomputed on every write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveMetadata {
    pub slot: u32,
    #[serde(default)]
    pub save_name: String,
    pub timestamp: String,
    pub game_version: String,
    pub current_scene: String,
    #[serde(default)]
    pub scene_description: String,
    #[serde(default)]
    pub playtime: f64,
    #[serde(default)]
    pub completion_percentage: f64,
    #[serde(default)]
    pub visited_scenes_count: usize,
    #[serde(default)]
    pub total_choices_made: usize,
}

impl SaveMetadata {
    pub fn describe(
        slot: u32,
        name: String,
        timestamp: String,
        game_version: &str,
        snapshot: &GameStateSnapshot,
    ) -> Self {
        Self {
            slot,
            save_name: name,
            timestamp,
            game_version: game_version.to_string(),
            current_scene: snapshot.current_scene.clone(),
            scene_description: scene_description(
                snapshot.story_title.as_deref(),
                &snapshot.current_scene,
            ),
            playtime: snapshot.playtime,
            completion_percentage: completion_percentage(
                snapshot.visited_scenes.len(),
                snapshot.total_scenes.unwrap_or(1),
            ),
            visited_scenes_count: snapshot.visited_scenes.len(),
            total_choices_made: snapshot.choice_history.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveRecord {
    pub metadata: SaveMetadata,
    pub game_state: GameStateSnapshot,
}

/// Reads only the metadata half of a record; `game_state` is skipped.
#[derive(Debug, Deserialize)]
pub(crate) struct MetadataEnvelope {
    pub metadata: SaveMetadata,
}

/// Structural check run before a record is trusted. Returns the first problem found.
pub fn validate_record(value: &Value) -> Result<(), String> {
    let root = value
        .as_object()
        .ok_or_else(|| "record is not a JSON object".to_string())?;

    for (section, keys) in [
        ("metadata", &METADATA_KEYS[..]),
        ("game_state", &GAME_STATE_KEYS[..]),
    ] {
        let object = root
            .get(section)
            .ok_or_else(|| format!("missing top-level key `{section}`"))?
            .as_object()
            .ok_or_else(|| format!("`{section}` is not an object"))?;
        if let Some(key) = keys.iter().find(|key| !object.contains_key(**key)) {
            return Err(format!("`{section}` is missing key `{key}`"));
        }
    }
    Ok(())
}

/// Only the leading numeric component is compared. Unparseable versions are incompatible.
pub fn is_compatible_version(saved: &str, current: &str) -> bool {
    match (major_version(saved), major_version(current)) {
        (Some(saved), Some(current)) => saved == current,
        _ => false,
    }
}

fn major_version(version: &str) -> Option<u64> {
    version.trim().split('.').next()?.parse().ok()
}

pub fn scene_description(story_title: Option<&str>, scene_id: &str) -> String {
    let title = story_title.unwrap_or("Unknown Story");
    let scene = scene_id
        .split('_')
        .filter(|word| !word.is_empty())
        .map(title_case)
        .collect::<Vec<_>>()
        .join(" ");
    format!("{title} - {scene}")
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

pub(crate) fn completion_percentage(visited: usize, total_scenes: usize) -> f64 {
    if total_scenes == 0 {
        return 0.0;
    }
    (visited as f64 / total_scenes as f64 * 100.0).min(100.0)
}

pub fn format_playtime(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

#[cfg(test)]
mod record_tests {
    use super::*;
    use serde_json::json;

    fn valid_record() -> Value {
        json!({
            "metadata": {
                "slot": 1,
                "timestamp": "2024-01-01T10:00:00",
                "game_version": "1.0.0",
                "current_scene": "opening"
            },
            "game_state": {
                "current_scene": "opening",
                "visited_scenes": ["opening"],
                "flags": {}
            }
        })
    }

    #[test]
    fn validate_record_accepts_minimal_record() {
        validate_record(&valid_record()).expect("minimal record is valid");
    }

    #[test]
    fn validate_record_reports_first_missing_key() {
        let mut record = valid_record();
        record["game_state"]
            .as_object_mut()
            .expect("object")
            .remove("flags");
        let error = validate_record(&record).expect_err("flags missing");
        assert!(error.contains("flags"));

        let mut record = valid_record();
        record.as_object_mut().expect("object").remove("metadata");
        let error = validate_record(&record).expect_err("metadata missing");
        assert!(error.contains("metadata"));

        let error = validate_record(&json!([1, 2])).expect_err("not an object");
        assert!(error.contains("not a JSON object"));
    }

    #[test]
    fn version_compatibility_compares_major_only() {
        assert!(is_compatible_version("1.4.2", "1.0.0"));
        assert!(!is_compatible_version("2.0.0", "1.0.0"));
        assert!(!is_compatible_version("beta", "1.0.0"));
        assert!(is_compatible_version("1", "1.0.0"));
    }

    #[test]
    fn scene_description_title_cases_scene_id() {
        assert_eq!(
            scene_description(Some("The Last Case"), "warehouse_raid"),
            "The Last Case - Warehouse Raid"
        );
        assert_eq!(scene_description(None, "opening"), "Unknown Story - Opening");
    }

    #[test]
    fn completion_is_clamped_and_guards_zero_total() {
        assert_eq!(completion_percentage(2, 4), 50.0);
        assert_eq!(completion_percentage(5, 1), 100.0);
        assert_eq!(completion_percentage(3, 0), 0.0);
    }

    #[test]
    fn format_playtime_switches_on_hours() {
        assert_eq!(format_playtime(59.0), "0m");
        assert_eq!(format_playtime(125.0), "2m");
        assert_eq!(format_playtime(3_725.0), "1h 2m");
    }

    #[test]
    fn metadata_envelope_ignores_game_state_shape() {
        let text = r#"{
            "metadata": {"slot": 3, "save_name": "Dock", "timestamp": "2024-01-01T10:00:00",
                         "game_version": "1.0.0", "current_scene": "docks"},
            "game_state": "not even an object"
        }"#;
        let envelope: MetadataEnvelope = serde_json::from_str(text).expect("metadata parses");
        assert_eq!(envelope.metadata.slot, 3);
        assert_eq!(envelope.metadata.save_name, "Dock");
        assert_eq!(envelope.metadata.visited_scenes_count, 0);
    }
}
