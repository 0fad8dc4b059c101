use std::path::{Path, PathBuf};

use tracing::warn;
use tt_core::TheatreError;
use tt_save::SaveManager;

use crate::{json_text, map_cli_state_invalid, map_save_error, SavesArgs, SavesCommand};

/// Explicit directory, else the per-user default, else a directory under the working dir.
pub(crate) fn resolve_save_dir(save_dir: Option<&str>) -> PathBuf {
    match save_dir {
        Some(save_dir) => PathBuf::from(save_dir),
        None => SaveManager::default_save_dir().unwrap_or_else(|| {
            warn!("home directory unavailable; saving under the working directory");
            PathBuf::from(".terminal_theatre").join("saves")
        }),
    }
}

pub(crate) fn run_saves(args: SavesArgs) -> Result<i32, TheatreError> {
    let manager = SaveManager::new(resolve_save_dir(args.save_dir.as_deref()));
    let lines = saves_lines(&manager, &args.command)?;
    println!("RESULT:OK");
    for line in lines {
        println!("{line}");
    }
    Ok(0)
}

pub(crate) fn saves_lines(
    manager: &SaveManager,
    command: &SavesCommand,
) -> Result<Vec<String>, TheatreError> {
    match command {
        SavesCommand::List => {
            let mut lines = Vec::new();
            for (slot, metadata) in manager.list_saves().iter().enumerate() {
                match metadata {
                    Some(metadata) => lines.push(format!(
                        "SLOT:{slot}|{}",
                        serde_json::to_string(metadata).map_err(map_cli_state_invalid)?
                    )),
                    None => lines.push(format!("SLOT:{slot}|EMPTY")),
                }
            }
            lines.push(format!(
                "CONTINUE:{}",
                manager
                    .continue_slot()
                    .map_or_else(|| "NONE".to_string(), |slot| slot.to_string())
            ));
            Ok(lines)
        }
        SavesCommand::Delete { slot } => {
            let deleted = manager.try_delete_save(*slot).map_err(map_save_error)?;
            Ok(vec![format!("DELETED:{slot}|{deleted}")])
        }
        SavesCommand::Export { slot, path } => {
            manager
                .try_export_save(*slot, Path::new(path))
                .map_err(map_save_error)?;
            Ok(vec![format!("EXPORTED:{slot}|{path}")])
        }
        SavesCommand::Import { path, slot } => {
            let metadata = manager
                .try_import_save(Path::new(path), *slot)
                .map_err(map_save_error)?;
            Ok(vec![format!(
                "IMPORTED:{slot}|{}",
                json_text(&metadata.save_name)
            )])
        }
    }
}
