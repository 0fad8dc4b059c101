use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{code}: {message}")]
pub struct TheatreError {
    pub code: String,
    pub message: String,
    pub scene_id: Option<String>,
}

impl TheatreError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            scene_id: None,
        }
    }

    pub fn at_scene(
        code: impl Into<String>,
        message: impl Into<String>,
        scene_id: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            scene_id: Some(scene_id.into()),
        }
    }

    /// Raised by presenters when the player interrupts input.
    pub fn cancelled() -> Self {
        Self::new(INPUT_CANCELLED, "Input was cancelled by the player.")
    }

    pub fn is_cancellation(&self) -> bool {
        self.code == INPUT_CANCELLED
    }
}

pub const INPUT_CANCELLED: &str = "INPUT_CANCELLED";
