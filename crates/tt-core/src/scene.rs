use serde::{Deserialize, Serialize};

use crate::state::GameState;
use crate::value::StateValue;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueLine {
    pub speaker: String,
    pub text: String,
}

/// Narrative payload of a scene. The engine hands it to the presenter untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneContent {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub dialogue: Vec<DialogueLine>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub art: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<String>,
}

/// Predicate over player state gating a choice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Condition {
    HasFlag { name: String },
    NotFlag { name: String },
    HasItem { name: String },
    Visited { scene: String },
    VarEquals { name: String, value: StateValue },
    VarAtLeast { name: String, value: f64 },
    All { conditions: Vec<Condition> },
    Any { conditions: Vec<Condition> },
    Not { condition: Box<Condition> },
}

impl Condition {
    pub fn has_flag(name: impl Into<String>) -> Self {
        Self::HasFlag { name: name.into() }
    }

    pub fn has_item(name: impl Into<String>) -> Self {
        Self::HasItem { name: name.into() }
    }

    pub fn visited(scene: impl Into<String>) -> Self {
        Self::Visited {
            scene: scene.into(),
        }
    }

    pub fn negate(self) -> Self {
        Self::Not {
            condition: Box::new(self),
        }
    }

    pub fn evaluate(&self, state: &GameState) -> bool {
        match self {
            Self::HasFlag { name } => state.has_flag(name),
            Self::NotFlag { name } => !state.has_flag(name),
            Self::HasItem { name } => state.has_item(name),
            Self::Visited { scene } => state.has_visited(scene),
            Self::VarEquals { name, value } => state.variable(name) == Some(value),
            Self::VarAtLeast { name, value } => state
                .variable(name)
                .and_then(StateValue::as_number)
                .map(|current| current >= *value)
                .unwrap_or(false),
            Self::All { conditions } => conditions.iter().all(|entry| entry.evaluate(state)),
            Self::Any { conditions } => conditions.iter().any(|entry| entry.evaluate(state)),
            Self::Not { condition } => !condition.evaluate(state),
        }
    }
}

/// State mutation applied when a scene is entered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Effect {
    SetFlag {
        name: String,
        #[serde(default = "default_flag_value")]
        value: bool,
    },
    ClearFlag {
        name: String,
    },
    AddItem {
        name: String,
    },
    RemoveItem {
        name: String,
    },
    SetVar {
        name: String,
        value: StateValue,
    },
    AddVar {
        name: String,
        amount: i64,
    },
}

fn default_flag_value() -> bool {
    true
}

impl Effect {
    pub fn set_flag(name: impl Into<String>) -> Self {
        Self::SetFlag {
            name: name.into(),
            value: true,
        }
    }

    pub fn add_item(name: impl Into<String>) -> Self {
        Self::AddItem { name: name.into() }
    }

    pub fn apply(&self, state: &mut GameState) {
        match self {
            Self::SetFlag { name, value } => state.set_flag(name, *value),
            Self::ClearFlag { name } => state.clear_flag(name),
            Self::AddItem { name } => state.add_item(name),
            Self::RemoveItem { name } => {
                state.remove_item(name);
            }
            Self::SetVar { name, value } => state.set_variable(name, value.clone()),
            Self::AddVar { name, amount } => {
                let next = match state.variable(name) {
                    Some(StateValue::Int(current)) => {
                        StateValue::Int(current.saturating_add(*amount))
                    }
                    Some(StateValue::Float(current)) => StateValue::Float(current + *amount as f64),
                    _ => StateValue::Int(*amount),
                };
                state.set_variable(name, next);
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Choice {
    pub text: String,
    pub next_scene: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
}

impl Choice {
    pub fn new(text: impl Into<String>, next_scene: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            next_scene: next_scene.into(),
            condition: None,
        }
    }

    pub fn when(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    pub fn is_available(&self, state: &GameState) -> bool {
        self.condition
            .as_ref()
            .map(|condition| condition.evaluate(state))
            .unwrap_or(true)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub id: String,
    #[serde(flatten)]
    pub content: SceneContent,
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub is_ending: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub on_enter: Vec<Effect>,
}

impl Scene {
    pub fn new(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: SceneContent {
                description: description.into(),
                ..SceneContent::default()
            },
            choices: Vec::new(),
            is_ending: false,
            on_enter: Vec::new(),
        }
    }

    pub fn ending(mut self) -> Self {
        self.is_ending = true;
        self
    }

    pub fn with_choice(mut self, choice: Choice) -> Self {
        self.choices.push(choice);
        self
    }

    pub fn with_dialogue(mut self, speaker: impl Into<String>, text: impl Into<String>) -> Self {
        self.content.dialogue.push(DialogueLine {
            speaker: speaker.into(),
            text: text.into(),
        });
        self
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.on_enter.push(effect);
        self
    }

    /// Runs the enter hook. Effects apply in authored order.
    pub fn enter(&self, state: &mut GameState) {
        for effect in &self.on_enter {
            effect.apply(state);
        }
    }
}
