mod boundary;
mod config;
mod controller;
mod presenter;

pub use boundary::{Boundary, ChoiceView, SceneView, SessionOutcome};
pub use config::ControllerConfig;
pub use controller::GameController;
pub use presenter::{Notice, Presenter, SaveRequest, SlotSummary, SAVE_GAME_LABEL};

pub const ENGINE_NOT_STARTED: &str = "ENGINE_NOT_STARTED";
pub const ENGINE_NO_PENDING_CHOICE: &str = "ENGINE_NO_PENDING_CHOICE";
pub const ENGINE_CHOICE_INDEX: &str = "ENGINE_CHOICE_INDEX";
pub const STATE_STORY_MISMATCH: &str = "STATE_STORY_MISMATCH";
pub const SAVE_FAILED: &str = "SAVE_FAILED";
