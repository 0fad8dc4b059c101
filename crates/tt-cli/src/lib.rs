use std::ffi::OsString;

use clap::Parser;
use tt_core::TheatreError;

mod agent;
mod boundary_runner;
mod check;
mod cli_args;
mod error_map;
mod line_presenter;
mod logging;
mod models;
mod play;
mod saves;
mod state_store;
mod story_loader;

pub(crate) use boundary_runner::{emit_boundary, json_text};
pub(crate) use cli_args::{
    AgentArgs, AgentCommand, CheckArgs, ChooseArgs, Cli, Mode, PlayArgs, SavesArgs, SavesCommand,
    StartArgs,
};
pub(crate) use error_map::{
    emit_error, map_cli_state_invalid, map_cli_state_read, map_cli_state_write,
    map_cli_story_path, map_play_io, map_save_error,
};
pub(crate) use line_presenter::LinePresenter;
pub(crate) use models::{AgentState, AGENT_STATE_SCHEMA};
pub(crate) use saves::resolve_save_dir;
pub(crate) use state_store::{load_agent_state, save_agent_state};
pub(crate) use story_loader::{find_story_by_id, load_story, load_story_by_ref, LoadedStory};

pub fn run_cli_from_args<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(error) => {
            let _ = error.print();
            return error.exit_code();
        }
    };
    logging::init_tracing();
    match run(cli) {
        Ok(code) => code,
        Err(error) => emit_error(error),
    }
}

fn run(cli: Cli) -> Result<i32, TheatreError> {
    match cli.command {
        Mode::Play(args) => play::run_play(args),
        Mode::Agent(args) => agent::run_agent(args),
        Mode::Saves(args) => saves::run_saves(args),
        Mode::Check(args) => check::run_check(args),
    }
}
