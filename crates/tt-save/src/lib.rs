mod atomic_io;
mod manager;
mod record;

pub use manager::{LoadedSave, SaveManager};
pub use record::{
    format_playtime, is_compatible_version, scene_description, validate_record, SaveMetadata,
    SaveRecord,
};

use std::path::PathBuf;

use thiserror::Error;
use tt_core::TheatreError;

pub const AUTOSAVE_SLOT: u32 = 0;
pub const MAX_SAVE_SLOTS: u32 = 10;
pub const GAME_VERSION: &str = "1.0.0";

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("Save slot {slot} is out of range; valid slots are 0..{slot_count}.")]
    SlotOutOfRange { slot: u32, slot_count: u32 },
    #[error("No save found at {path}.")]
    NotFound { path: PathBuf },
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Save file {path} is corrupted: {reason}")]
    Corrupted { path: PathBuf, reason: String },
    #[error("Failed to serialize save record: {0}")]
    Serialize(serde_json::Error),
}

impl SaveError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::SlotOutOfRange { .. } => "SAVE_SLOT_RANGE",
            Self::NotFound { .. } => "SAVE_NOT_FOUND",
            Self::Io { .. } => "SAVE_IO",
            Self::Parse { .. } => "SAVE_PARSE",
            Self::Corrupted { .. } => "SAVE_CORRUPTED",
            Self::Serialize(_) => "SAVE_SERIALIZE",
        }
    }

    /// Parse failures and validation failures both mean the slot cannot be trusted.
    pub fn is_corruption(&self) -> bool {
        matches!(self, Self::Parse { .. } | Self::Corrupted { .. })
    }
}

impl From<SaveError> for TheatreError {
    fn from(error: SaveError) -> Self {
        TheatreError::new(error.code(), error.to_string())
    }
}
