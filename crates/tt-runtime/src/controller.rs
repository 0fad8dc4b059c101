use tracing::{debug, error, info, warn};
use tt_core::{GameState, GameStateSnapshot, Scene, TheatreError};
use tt_save::{SaveManager, SaveMetadata, AUTOSAVE_SLOT};
use tt_story::{Story, STORY_SCENE_MISSING};

use crate::{
    Boundary, ChoiceView, ControllerConfig, SceneView, ENGINE_CHOICE_INDEX,
    ENGINE_NOT_STARTED, ENGINE_NO_PENDING_CHOICE, SAVE_FAILED, STATE_STORY_MISMATCH,
};

#[derive(Debug, Clone)]
struct PendingChoice {
    text: String,
    next_scene: String,
}

#[derive(Debug, Clone)]
enum Phase {
    NotStarted,
    Entering {
        scene_id: String,
        via_choice: bool,
    },
    AwaitingChoice {
        view: SceneView,
        choices: Vec<PendingChoice>,
    },
    Finished(Boundary),
}

/// Drives one play session over a borrowed [`Story`].
///
/// The controller owns the only live [`GameState`]. Input is fed in through
/// [`GameController::choose`] and output is pulled with
/// [`GameController::advance`], one boundary at a time.
#[derive(Debug)]
pub struct GameController<'s> {
    story: &'s Story,
    saves: SaveManager,
    config: ControllerConfig,
    state: GameState,
    phase: Phase,
    scenes_since_autosave: u32,
    resumed: bool,
}

impl<'s> GameController<'s> {
    pub fn new(story: &'s Story, saves: SaveManager, config: ControllerConfig) -> Self {
        Self {
            story,
            saves,
            config,
            state: GameState::new(),
            phase: Phase::NotStarted,
            scenes_since_autosave: 0,
            resumed: false,
        }
    }

    pub fn story(&self) -> &'s Story {
        self.story
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn saves(&self) -> &SaveManager {
        &self.saves
    }

    pub fn config(&self) -> ControllerConfig {
        self.config
    }

    pub fn is_resumed(&self) -> bool {
        self.resumed
    }

    pub fn start_new(&mut self) {
        self.state = GameState::new();
        self.state.start_session();
        self.scenes_since_autosave = 0;
        self.resumed = false;
        self.phase = Phase::Entering {
            scene_id: self.story.entry_scene().to_string(),
            via_choice: false,
        };
        info!(story = %self.story.id(), "new game started");
    }

    /// Restores `snapshot` and re-enters its current scene on the next [`Self::advance`].
    pub fn resume(&mut self, snapshot: GameStateSnapshot) -> Result<(), TheatreError> {
        self.restore(snapshot)?;
        let scene_id = if self.state.current_scene().is_empty() {
            self.story.entry_scene().to_string()
        } else {
            self.state.current_scene().to_string()
        };
        info!(story = %self.story.id(), scene = %scene_id, "game resumed");
        self.phase = Phase::Entering {
            scene_id,
            via_choice: false,
        };
        Ok(())
    }

    /// Restores `snapshot` at the prompt it was taken from, without re-entering the scene.
    pub fn resume_at_prompt(
        &mut self,
        snapshot: GameStateSnapshot,
    ) -> Result<Boundary, TheatreError> {
        self.restore(snapshot)?;
        let scene_id = self.state.current_scene().to_string();
        let story = self.story;
        let scene = self.resolve(story, &scene_id)?;
        Ok(self.settle(story, scene))
    }

    /// Runs until the next input boundary. Repeated calls at a boundary return it again.
    pub fn advance(&mut self) -> Result<Boundary, TheatreError> {
        match &self.phase {
            Phase::NotStarted => Err(TheatreError::new(
                ENGINE_NOT_STARTED,
                "Call start_new or resume before advancing.",
            )),
            Phase::Entering {
                scene_id,
                via_choice,
            } => {
                let scene_id = scene_id.clone();
                let via_choice = *via_choice;
                self.enter_scene(&scene_id, via_choice)
            }
            Phase::AwaitingChoice { view, choices } => Ok(Boundary::Choices {
                view: view.clone(),
                choices: choice_views(choices),
            }),
            Phase::Finished(boundary) => Ok(boundary.clone()),
        }
    }

    /// Takes the choice at `index` among the currently available ones.
    pub fn choose(&mut self, index: usize) -> Result<(), TheatreError> {
        let Phase::AwaitingChoice { view, choices } = &self.phase else {
            return Err(TheatreError::new(
                ENGINE_NO_PENDING_CHOICE,
                "No choice is pending.",
            ));
        };
        let Some(choice) = choices.get(index) else {
            return Err(TheatreError::at_scene(
                ENGINE_CHOICE_INDEX,
                format!(
                    "Choice index {index} is out of range; {} choices are available.",
                    choices.len()
                ),
                view.scene_id.clone(),
            ));
        };

        let next_scene = choice.next_scene.clone();
        self.state.record_choice(&view.scene_id, index, &choice.text);
        debug!(scene = %view.scene_id, index, next = %next_scene, "choice taken");
        self.phase = Phase::Entering {
            scene_id: next_scene,
            via_choice: true,
        };
        Ok(())
    }

    /// Playtime-current snapshot carrying this story's context.
    pub fn snapshot(&mut self) -> GameStateSnapshot {
        self.state.checkpoint_snapshot().with_story_context(
            self.story.id(),
            self.story.title(),
            self.story.scene_count(),
        )
    }

    pub fn save_to_slot(
        &mut self,
        slot: u32,
        name: Option<&str>,
    ) -> Result<SaveMetadata, TheatreError> {
        let snapshot = self.snapshot();
        self.saves
            .try_save_game(slot, &snapshot, name)
            .map_err(|error| TheatreError::new(SAVE_FAILED, error.to_string()))
    }

    fn restore(&mut self, snapshot: GameStateSnapshot) -> Result<(), TheatreError> {
        if let Some(story_id) = snapshot.story_id.as_deref() {
            if story_id != self.story.id() {
                return Err(TheatreError::new(
                    STATE_STORY_MISMATCH,
                    format!(
                        "Saved state belongs to story `{story_id}`, not `{}`.",
                        self.story.id()
                    ),
                ));
            }
        }
        self.state = GameState::from_snapshot(snapshot);
        self.scenes_since_autosave = 0;
        self.resumed = true;
        Ok(())
    }

    fn resolve(&self, story: &'s Story, scene_id: &str) -> Result<&'s Scene, TheatreError> {
        story.get_scene(scene_id).ok_or_else(|| {
            error!(story = %story.id(), scene = %scene_id, "scene referenced but not authored");
            TheatreError::at_scene(
                STORY_SCENE_MISSING,
                format!("Scene `{scene_id}` does not exist in story `{}`.", story.id()),
                scene_id,
            )
        })
    }

    fn enter_scene(&mut self, scene_id: &str, via_choice: bool) -> Result<Boundary, TheatreError> {
        let story = self.story;
        let scene = self.resolve(story, scene_id)?;

        self.state.visit_scene(&scene.id);
        if via_choice && !scene.is_ending {
            self.tick_autosave();
        }
        scene.enter(&mut self.state);
        debug!(scene = %scene.id, ending = scene.is_ending, "scene entered");

        Ok(self.settle(story, scene))
    }

    fn settle(&mut self, story: &'s Story, scene: &'s Scene) -> Boundary {
        let view = SceneView::of(scene);
        if scene.is_ending {
            info!(scene = %scene.id, "ending reached");
            let boundary = Boundary::Ending { view };
            self.phase = Phase::Finished(boundary.clone());
            return boundary;
        }

        let choices: Vec<PendingChoice> = story
            .available_choices(scene, &self.state)
            .into_iter()
            .map(|choice| PendingChoice {
                text: choice.text.clone(),
                next_scene: choice.next_scene.clone(),
            })
            .collect();
        if choices.is_empty() {
            warn!(scene = %scene.id, "dead end: no choices available");
            let boundary = Boundary::DeadEnd { view };
            self.phase = Phase::Finished(boundary.clone());
            return boundary;
        }

        let boundary = Boundary::Choices {
            view: view.clone(),
            choices: choice_views(&choices),
        };
        self.phase = Phase::AwaitingChoice { view, choices };
        boundary
    }

    fn tick_autosave(&mut self) {
        if !self.config.autosave_enabled() {
            return;
        }
        self.scenes_since_autosave += 1;
        if self.scenes_since_autosave < self.config.autosave_interval {
            return;
        }
        self.scenes_since_autosave = 0;

        let snapshot = self.snapshot();
        if let Err(error) = self.saves.try_save_game(AUTOSAVE_SLOT, &snapshot, None) {
            warn!(code = error.code(), %error, "autosave failed");
        }
    }
}

fn choice_views(choices: &[PendingChoice]) -> Vec<ChoiceView> {
    choices
        .iter()
        .enumerate()
        .map(|(index, choice)| ChoiceView {
            index,
            text: choice.text.clone(),
        })
        .collect()
}
