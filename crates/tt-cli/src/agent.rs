use std::path::Path;

use tt_core::TheatreError;
use tt_runtime::{Boundary, ControllerConfig, GameController};
use tt_save::SaveManager;
use tt_story::Story;

use crate::{
    emit_boundary, load_agent_state, load_story, load_story_by_ref, resolve_save_dir,
    save_agent_state, AgentArgs, AgentCommand, AgentState, ChooseArgs, StartArgs,
};

pub(super) fn run_agent(args: AgentArgs) -> Result<i32, TheatreError> {
    match args.command {
        AgentCommand::Start(args) => run_start(args),
        AgentCommand::Choose(args) => run_choose(args),
    }
}

pub(super) fn run_start(args: StartArgs) -> Result<i32, TheatreError> {
    let loaded = load_story(args.story.as_deref(), None)?;
    let mut controller = agent_controller(&loaded.story);
    controller.start_new();

    let boundary = controller.advance()?;
    emit_boundary_with_saved_state(&mut controller, &boundary, &args.state_out, &loaded.story_ref)
}

pub(super) fn run_choose(args: ChooseArgs) -> Result<i32, TheatreError> {
    let state = load_agent_state(Path::new(&args.state_in))?;
    let loaded = match args.story.as_deref() {
        Some(story_file) => load_story(Some(story_file), None)?,
        None => load_story_by_ref(&state.story_ref)?,
    };
    let mut controller = agent_controller(&loaded.story);
    controller.resume_at_prompt(state.snapshot)?;
    controller.choose(args.choice)?;

    let boundary = controller.advance()?;
    emit_boundary_with_saved_state(&mut controller, &boundary, &args.state_out, &loaded.story_ref)
}

/// Agent steps never autosave; the state file is the only persistence.
fn agent_controller(story: &Story) -> GameController<'_> {
    GameController::new(
        story,
        SaveManager::new(resolve_save_dir(None)),
        ControllerConfig::default().with_autosave_interval(0),
    )
}

fn emit_boundary_with_saved_state(
    controller: &mut GameController<'_>,
    boundary: &Boundary,
    state_out: &str,
    story_ref: &str,
) -> Result<i32, TheatreError> {
    if boundary.is_terminal() {
        emit_boundary(boundary, None);
        return Ok(0);
    }

    let state = AgentState::new(story_ref, controller.snapshot());
    save_agent_state(Path::new(state_out), &state)?;
    emit_boundary(boundary, Some(state_out));
    Ok(0)
}
