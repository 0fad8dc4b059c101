use std::fmt::Display;

use tt_core::TheatreError;
use tt_save::SaveError;

use crate::json_text;

fn map_error(code: &'static str, error: impl Display) -> TheatreError {
    TheatreError::new(code, error.to_string())
}

pub(crate) fn emit_error(error: TheatreError) -> i32 {
    println!("RESULT:ERROR");
    println!("ERROR_CODE:{}", error.code);
    println!("ERROR_MSG_JSON:{}", json_text(&error.message));
    1
}

pub(crate) fn map_play_io(error: std::io::Error) -> TheatreError {
    map_error("PLAY_IO", error)
}

pub(crate) fn map_cli_story_path(error: std::io::Error) -> TheatreError {
    map_error("CLI_STORY_PATH", error)
}

pub(crate) fn map_cli_state_write(error: std::io::Error) -> TheatreError {
    map_error("CLI_STATE_WRITE", error)
}

pub(crate) fn map_cli_state_read(error: std::io::Error) -> TheatreError {
    map_error("CLI_STATE_READ", error)
}

pub(crate) fn map_cli_state_invalid(error: serde_json::Error) -> TheatreError {
    map_error("CLI_STATE_INVALID", error)
}

pub(crate) fn map_save_error(error: SaveError) -> TheatreError {
    error.into()
}
