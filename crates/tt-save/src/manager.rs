use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, NaiveDateTime};
use directories::BaseDirs;
use serde_json::Value;
use tracing::{debug, info, warn};
use tt_core::GameStateSnapshot;

use crate::atomic_io::write_text_atomic;
use crate::record::{
    is_compatible_version, validate_record, MetadataEnvelope, SaveMetadata, SaveRecord,
};
use crate::{SaveError, AUTOSAVE_SLOT, GAME_VERSION, MAX_SAVE_SLOTS};

/// A successfully validated record, plus the compatibility warning if one applies.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedSave {
    pub metadata: SaveMetadata,
    pub state: GameStateSnapshot,
    pub version_warning: Option<String>,
}

/// Slotted JSON saves under one directory. Slot 0 is the autosave.
#[derive(Debug, Clone)]
pub struct SaveManager {
    save_dir: PathBuf,
    slot_count: u32,
    game_version: String,
}

impl SaveManager {
    /// The directory is created lazily on the first write.
    pub fn new(save_dir: impl Into<PathBuf>) -> Self {
        Self {
            save_dir: save_dir.into(),
            slot_count: MAX_SAVE_SLOTS,
            game_version: GAME_VERSION.to_string(),
        }
    }

    pub fn with_slot_count(mut self, slot_count: u32) -> Self {
        self.slot_count = slot_count.max(1);
        self
    }

    pub fn with_game_version(mut self, game_version: impl Into<String>) -> Self {
        self.game_version = game_version.into();
        self
    }

    /// `<home>/.terminal_theatre/saves`, when a home directory can be resolved.
    pub fn default_save_dir() -> Option<PathBuf> {
        BaseDirs::new().map(|dirs| dirs.home_dir().join(".terminal_theatre").join("saves"))
    }

    pub fn save_dir(&self) -> &Path {
        &self.save_dir
    }

    pub fn slot_count(&self) -> u32 {
        self.slot_count
    }

    pub fn game_version(&self) -> &str {
        &self.game_version
    }

    pub fn slot_path(&self, slot: u32) -> PathBuf {
        if slot == AUTOSAVE_SLOT {
            self.save_dir.join("autosave.json")
        } else {
            self.save_dir.join(format!("save_slot_{slot}.json"))
        }
    }

    pub fn default_save_name(slot: u32) -> String {
        if slot == AUTOSAVE_SLOT {
            "Autosave".to_string()
        } else {
            format!("Save {slot}")
        }
    }

    pub fn save_game(&self, slot: u32, snapshot: &GameStateSnapshot, name: Option<&str>) -> bool {
        match self.try_save_game(slot, snapshot, name) {
            Ok(_) => true,
            Err(error) => {
                warn!(slot, code = error.code(), %error, "save failed");
                false
            }
        }
    }

    pub fn try_save_game(
        &self,
        slot: u32,
        snapshot: &GameStateSnapshot,
        name: Option<&str>,
    ) -> Result<SaveMetadata, SaveError> {
        self.check_slot(slot)?;
        let name = name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| Self::default_save_name(slot));
        let metadata = SaveMetadata::describe(
            slot,
            name,
            Local::now().to_rfc3339(),
            &self.game_version,
            snapshot,
        );
        let record = SaveRecord {
            metadata,
            game_state: snapshot.clone(),
        };
        let path = self.slot_path(slot);
        self.write_record(&path, &record)?;
        info!(
            slot,
            path = %path.display(),
            scene = %record.metadata.current_scene,
            "save written"
        );
        Ok(record.metadata)
    }

    pub fn load_game(&self, slot: u32) -> Option<GameStateSnapshot> {
        match self.try_load_game(slot) {
            Ok(loaded) => loaded.map(|loaded| loaded.state),
            Err(error) => {
                warn!(slot, code = error.code(), %error, "save could not be loaded");
                None
            }
        }
    }

    /// `Ok(None)` means the slot is empty. Corrupted records are errors, never partial states.
    pub fn try_load_game(&self, slot: u32) -> Result<Option<LoadedSave>, SaveError> {
        self.check_slot(slot)?;
        let path = self.slot_path(slot);
        let Some(text) = read_optional(&path)? else {
            return Ok(None);
        };
        let record = parse_record(&path, &text)?;

        let version_warning = if is_compatible_version(
            &record.metadata.game_version,
            &self.game_version,
        ) {
            None
        } else {
            let message = format!(
                "Save in slot {slot} was written by version {} and may not load correctly in version {}.",
                record.metadata.game_version, self.game_version
            );
            warn!(
                slot,
                saved = %record.metadata.game_version,
                current = %self.game_version,
                "save version mismatch"
            );
            Some(message)
        };

        debug!(slot, scene = %record.game_state.current_scene, "save loaded");
        Ok(Some(LoadedSave {
            metadata: record.metadata,
            state: record.game_state,
            version_warning,
        }))
    }

    pub fn get_save_metadata(&self, slot: u32) -> Option<SaveMetadata> {
        match self.try_get_save_metadata(slot) {
            Ok(metadata) => metadata,
            Err(error) => {
                debug!(slot, code = error.code(), %error, "save metadata unreadable");
                None
            }
        }
    }

    pub fn try_get_save_metadata(&self, slot: u32) -> Result<Option<SaveMetadata>, SaveError> {
        self.check_slot(slot)?;
        let path = self.slot_path(slot);
        let Some(text) = read_optional(&path)? else {
            return Ok(None);
        };
        let envelope: MetadataEnvelope =
            serde_json::from_str(&text).map_err(|source| SaveError::Parse {
                path: path.clone(),
                source,
            })?;
        Ok(Some(envelope.metadata))
    }

    /// One entry per slot, in slot order.
    pub fn list_saves(&self) -> Vec<Option<SaveMetadata>> {
        (0..self.slot_count)
            .map(|slot| self.get_save_metadata(slot))
            .collect()
    }

    pub fn delete_save(&self, slot: u32) -> bool {
        match self.try_delete_save(slot) {
            Ok(deleted) => deleted,
            Err(error) => {
                warn!(slot, code = error.code(), %error, "delete failed");
                false
            }
        }
    }

    /// `Ok(false)` when the slot was already empty.
    pub fn try_delete_save(&self, slot: u32) -> Result<bool, SaveError> {
        self.check_slot(slot)?;
        let path = self.slot_path(slot);
        match fs::remove_file(&path) {
            Ok(()) => {
                info!(slot, path = %path.display(), "save deleted");
                Ok(true)
            }
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(SaveError::Io { path, source }),
        }
    }

    /// Most recent manual save by timestamp. The autosave slot is never considered.
    pub fn get_last_save_slot(&self) -> Option<u32> {
        let mut latest: Option<(u32, NaiveDateTime)> = None;
        for slot in 1..self.slot_count {
            let Some(metadata) = self.get_save_metadata(slot) else {
                continue;
            };
            let Some(stamp) = parse_timestamp(&metadata.timestamp) else {
                debug!(slot, timestamp = %metadata.timestamp, "unparseable save timestamp");
                continue;
            };
            if latest.map_or(true, |(_, best)| stamp > best) {
                latest = Some((slot, stamp));
            }
        }
        latest.map(|(slot, _)| slot)
    }

    pub fn has_autosave(&self) -> bool {
        self.slot_path(AUTOSAVE_SLOT).is_file()
    }

    /// Slot a "continue" should resume: the last manual save, else the autosave.
    pub fn continue_slot(&self) -> Option<u32> {
        self.get_last_save_slot()
            .or_else(|| self.has_autosave().then_some(AUTOSAVE_SLOT))
    }

    pub fn export_save(&self, slot: u32, export_path: &Path) -> bool {
        match self.try_export_save(slot, export_path) {
            Ok(()) => true,
            Err(error) => {
                warn!(slot, code = error.code(), %error, "export failed");
                false
            }
        }
    }

    pub fn try_export_save(&self, slot: u32, export_path: &Path) -> Result<(), SaveError> {
        self.check_slot(slot)?;
        let path = self.slot_path(slot);
        let text = read_optional(&path)?.ok_or_else(|| SaveError::NotFound {
            path: path.clone(),
        })?;
        let record = parse_record(&path, &text)?;
        self.write_record(export_path, &record)?;
        info!(slot, path = %export_path.display(), "save exported");
        Ok(())
    }

    pub fn import_save(&self, import_path: &Path, slot: u32) -> bool {
        match self.try_import_save(import_path, slot) {
            Ok(_) => true,
            Err(error) => {
                warn!(slot, code = error.code(), %error, "import failed");
                false
            }
        }
    }

    /// The imported record is validated in full and re-slotted before it replaces `slot`.
    pub fn try_import_save(
        &self,
        import_path: &Path,
        slot: u32,
    ) -> Result<SaveMetadata, SaveError> {
        self.check_slot(slot)?;
        let text = read_optional(import_path)?.ok_or_else(|| SaveError::NotFound {
            path: import_path.to_path_buf(),
        })?;
        let mut record = parse_record(import_path, &text)?;
        record.metadata.slot = slot;
        self.write_record(&self.slot_path(slot), &record)?;
        info!(slot, path = %import_path.display(), "save imported");
        Ok(record.metadata)
    }

    fn check_slot(&self, slot: u32) -> Result<(), SaveError> {
        if slot < self.slot_count {
            Ok(())
        } else {
            Err(SaveError::SlotOutOfRange {
                slot,
                slot_count: self.slot_count,
            })
        }
    }

    fn write_record(&self, path: &Path, record: &SaveRecord) -> Result<(), SaveError> {
        let text = serde_json::to_string_pretty(record).map_err(SaveError::Serialize)?;
        write_text_atomic(path, &text).map_err(|source| SaveError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn read_optional(path: &Path) -> Result<Option<String>, SaveError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(SaveError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn parse_record(path: &Path, text: &str) -> Result<SaveRecord, SaveError> {
    let value: Value = serde_json::from_str(text).map_err(|source| SaveError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    validate_record(&value).map_err(|reason| SaveError::Corrupted {
        path: path.to_path_buf(),
        reason,
    })?;
    serde_json::from_value(value).map_err(|error| SaveError::Corrupted {
        path: path.to_path_buf(),
        reason: error.to_string(),
    })
}

fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    if let Ok(stamp) = DateTime::parse_from_rfc3339(text) {
        return Some(stamp.with_timezone(&Local).naive_local());
    }
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f").ok()
}
