use std::fmt;

use serde::{Deserialize, Serialize};

/// Closed set of values a story variable may hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StateValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl StateValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value.as_str()),
            _ => None,
        }
    }

    /// Numeric view used by comparisons; ints widen to floats.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Int(value) => Some(*value as f64),
            Self::Float(value) => Some(*value),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "boolean",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
        }
    }
}

impl fmt::Display for StateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{}", value),
            Self::Int(value) => write!(f, "{}", value),
            Self::Float(value) => write!(f, "{}", value),
            Self::String(value) => write!(f, "{}", value),
        }
    }
}

impl From<bool> for StateValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for StateValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for StateValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for StateValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for StateValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

#[cfg(test)]
mod value_tests {
    use super::*;

    #[test]
    fn untagged_json_picks_the_narrowest_variant() {
        let parsed: Vec<StateValue> =
            serde_json::from_str(r#"[true, 42, 1.5, "clue"]"#).expect("values should parse");
        assert_eq!(
            parsed,
            vec![
                StateValue::Bool(true),
                StateValue::Int(42),
                StateValue::Float(1.5),
                StateValue::String("clue".to_string()),
            ]
        );
    }

    #[test]
    fn nested_json_is_rejected() {
        assert!(serde_json::from_str::<StateValue>(r#"{"a":1}"#).is_err());
        assert!(serde_json::from_str::<StateValue>("[1]").is_err());
        assert!(serde_json::from_str::<StateValue>("null").is_err());
    }

    #[test]
    fn numeric_view_widens_ints() {
        assert_eq!(StateValue::Int(3).as_number(), Some(3.0));
        assert_eq!(StateValue::Float(0.5).as_number(), Some(0.5));
        assert_eq!(StateValue::from("x").as_number(), None);
        assert_eq!(StateValue::from(true).as_bool(), Some(true));
        assert_eq!(StateValue::from("x").type_name(), "string");
    }
}
