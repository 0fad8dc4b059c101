use std::io::{self, BufRead, Write};

use tracing::{info, warn};
use tt_core::{GameStateSnapshot, TheatreError};
use tt_runtime::{ControllerConfig, GameController, Notice, Presenter};
use tt_save::SaveManager;

use crate::{
    find_story_by_id, load_story, map_save_error, resolve_save_dir, LinePresenter, LoadedStory,
    PlayArgs,
};

pub(crate) fn run_play(args: PlayArgs) -> Result<i32, TheatreError> {
    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut writer = io::stdout();
    run_play_with_io(args, &mut reader, &mut writer)
}

pub(crate) fn run_play_with_io(
    args: PlayArgs,
    reader: &mut dyn BufRead,
    writer: &mut dyn Write,
) -> Result<i32, TheatreError> {
    let loaded = load_story(args.story.as_deref(), args.stories_dir.as_deref())?;
    let saves = SaveManager::new(resolve_save_dir(args.save_dir.as_deref()));
    let config = ControllerConfig::default().with_autosave_interval(args.autosave_interval);
    let mut presenter = LinePresenter::new(reader, writer);

    let slot = if args.continue_game {
        let slot = saves.continue_slot();
        if slot.is_none() {
            presenter.say("No saved game found. Starting a new story.")?;
        }
        slot
    } else {
        args.load
    };
    let snapshot = match slot {
        Some(slot) => load_slot(&saves, slot, &mut presenter)?,
        None => None,
    };
    let (loaded, snapshot) = match snapshot {
        Some(snapshot) => {
            story_for_snapshot(loaded, snapshot, args.stories_dir.as_deref(), &mut presenter)?
        }
        None => (loaded, None),
    };

    let mut controller = GameController::new(&loaded.story, saves, config);
    match snapshot {
        Some(snapshot) => controller.resume(snapshot)?,
        None => controller.start_new(),
    }

    match controller.run(&mut presenter) {
        Ok(outcome) => {
            info!(?outcome, "session finished");
            presenter.announce_outcome(&outcome)?;
            Ok(0)
        }
        Err(error) if error.is_cancellation() => {
            info!("session cancelled by player");
            presenter.say("")?;
            presenter.say("Goodbye.")?;
            Ok(0)
        }
        Err(error) => Err(error),
    }
}

/// Swaps in the story a save was made with. A save whose story cannot be
/// found is reported and dropped so a new game starts instead.
fn story_for_snapshot(
    loaded: LoadedStory,
    snapshot: GameStateSnapshot,
    stories_dir: Option<&str>,
    presenter: &mut dyn Presenter,
) -> Result<(LoadedStory, Option<GameStateSnapshot>), TheatreError> {
    let story_id = match snapshot.story_id.clone() {
        Some(story_id) if story_id != loaded.story.id() => story_id,
        _ => return Ok((loaded, Some(snapshot))),
    };
    match find_story_by_id(&story_id, stories_dir)? {
        Some(found) => {
            info!(
                story_id = %story_id,
                story_ref = %found.story_ref,
                "resuming save with its own story"
            );
            Ok((found, Some(snapshot)))
        }
        None => {
            warn!(story_id = %story_id, "save belongs to an unavailable story");
            presenter.notify(&Notice::StoryUnavailable { story_id })?;
            Ok((loaded, None))
        }
    }
}

/// Unreadable slots are reported and treated as empty.
fn load_slot(
    saves: &SaveManager,
    slot: u32,
    presenter: &mut dyn Presenter,
) -> Result<Option<GameStateSnapshot>, TheatreError> {
    let reason = match saves.try_load_game(slot) {
        Ok(Some(loaded)) => {
            if let Some(warning) = loaded.version_warning {
                presenter.notify(&Notice::VersionWarning(warning))?;
            }
            return Ok(Some(loaded.state));
        }
        Ok(None) => "the slot is empty".to_string(),
        Err(error) if error.is_corruption() => {
            warn!(slot, code = error.code(), %error, "save corrupted");
            error.to_string()
        }
        Err(error) => return Err(map_save_error(error)),
    };
    presenter.notify(&Notice::LoadFailed { slot, reason })?;
    Ok(None)
}
