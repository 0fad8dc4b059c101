use tracing::warn;
use tt_core::TheatreError;
use tt_save::{SaveMetadata, MAX_SAVE_SLOTS};

use crate::{Boundary, ChoiceView, GameController, SceneView, SessionOutcome};

/// Label of the extra prompt entry that opens the save menu.
pub const SAVE_GAME_LABEL: &str = "[Save Game]";

const RESUME_SUBTITLE: &str = "Resuming your story...";

/// One row of the save menu.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotSummary {
    pub slot: u32,
    pub metadata: Option<SaveMetadata>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveRequest {
    pub slot: u32,
    pub name: Option<String>,
}

/// Out-of-band messages for the player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    InvalidSelection { selected: usize, available: usize },
    InvalidSlot { slot: u32 },
    Saved { slot: u32, name: String },
    SaveFailed { slot: u32, reason: String },
    VersionWarning(String),
    LoadFailed { slot: u32, reason: String },
    /// A save names a story that cannot be found.
    StoryUnavailable { story_id: String },
    DeadEnd { scene_id: String },
}

/// The presentation boundary. Implementations own all terminal I/O.
///
/// Returning an error with [`TheatreError::cancelled`] from any input method
/// unwinds the session without saving.
pub trait Presenter {
    fn show_title(&mut self, title: &str, subtitle: &str) -> Result<(), TheatreError>;

    fn render_scene(&mut self, view: &SceneView) -> Result<(), TheatreError>;

    /// Picks one of `labels` by position. Out-of-range answers are re-prompted.
    fn select(&mut self, labels: &[String]) -> Result<usize, TheatreError>;

    /// `None` cancels the menu.
    fn choose_save_slot(
        &mut self,
        slots: &[SlotSummary],
    ) -> Result<Option<SaveRequest>, TheatreError>;

    fn notify(&mut self, notice: &Notice) -> Result<(), TheatreError>;
}

impl GameController<'_> {
    /// Plays from the current position until an ending or a dead end.
    pub fn run(&mut self, presenter: &mut dyn Presenter) -> Result<SessionOutcome, TheatreError> {
        let story = self.story();
        let subtitle = if self.is_resumed() {
            RESUME_SUBTITLE
        } else {
            story.description()
        };
        presenter.show_title(story.title(), subtitle)?;

        loop {
            let (view, choices) = match self.advance()? {
                Boundary::Choices { view, choices } => (view, choices),
                Boundary::Ending { view } => {
                    presenter.render_scene(&view)?;
                    return Ok(SessionOutcome::Ending(view.scene_id));
                }
                Boundary::DeadEnd { view } => {
                    presenter.render_scene(&view)?;
                    presenter.notify(&Notice::DeadEnd {
                        scene_id: view.scene_id.clone(),
                    })?;
                    return Ok(SessionOutcome::DeadEnd(view.scene_id));
                }
            };
            presenter.render_scene(&view)?;
            let selected = self.prompt_choice(presenter, &choices)?;
            self.choose(selected)?;
        }
    }

    fn prompt_choice(
        &mut self,
        presenter: &mut dyn Presenter,
        choices: &[ChoiceView],
    ) -> Result<usize, TheatreError> {
        let mut labels: Vec<String> = choices.iter().map(|choice| choice.text.clone()).collect();
        labels.push(SAVE_GAME_LABEL.to_string());

        loop {
            let selected = presenter.select(&labels)?;
            if selected < choices.len() {
                return Ok(selected);
            }
            if selected == choices.len() {
                self.run_save_menu(presenter)?;
                continue;
            }
            presenter.notify(&Notice::InvalidSelection {
                selected,
                available: labels.len(),
            })?;
        }
    }

    fn run_save_menu(&mut self, presenter: &mut dyn Presenter) -> Result<(), TheatreError> {
        let shown = self.saves().slot_count().min(MAX_SAVE_SLOTS);
        let slots: Vec<SlotSummary> = (1..shown)
            .map(|slot| SlotSummary {
                slot,
                metadata: self.saves().get_save_metadata(slot),
            })
            .collect();

        let Some(request) = presenter.choose_save_slot(&slots)? else {
            return Ok(());
        };
        if !slots.iter().any(|summary| summary.slot == request.slot) {
            return presenter.notify(&Notice::InvalidSlot { slot: request.slot });
        }

        let notice = match self.save_to_slot(request.slot, request.name.as_deref()) {
            Ok(metadata) => Notice::Saved {
                slot: request.slot,
                name: metadata.save_name,
            },
            Err(error) => {
                warn!(slot = request.slot, %error, "manual save failed");
                Notice::SaveFailed {
                    slot: request.slot,
                    reason: error.message,
                }
            }
        };
        presenter.notify(&notice)
    }
}

#[cfg(test)]
mod presenter_tests {
    use std::collections::VecDeque;

    use super::*;
    use crate::ControllerConfig;
    use tt_core::{Choice, Condition, Effect, Scene, INPUT_CANCELLED};
    use tt_save::{SaveManager, AUTOSAVE_SLOT};
    use tt_story::Story;

    #[derive(Default)]
    struct ScriptedPresenter {
        selections: VecDeque<usize>,
        save_requests: VecDeque<Option<SaveRequest>>,
        titles: Vec<(String, String)>,
        rendered: Vec<String>,
        notices: Vec<Notice>,
        menus_shown: usize,
    }

    impl ScriptedPresenter {
        fn selecting(selections: &[usize]) -> Self {
            Self {
                selections: selections.iter().copied().collect(),
                ..Self::default()
            }
        }

        fn with_save_request(mut self, request: Option<SaveRequest>) -> Self {
            self.save_requests.push_back(request);
            self
        }
    }

    impl Presenter for ScriptedPresenter {
        fn show_title(&mut self, title: &str, subtitle: &str) -> Result<(), TheatreError> {
            self.titles.push((title.to_string(), subtitle.to_string()));
            Ok(())
        }

        fn render_scene(&mut self, view: &SceneView) -> Result<(), TheatreError> {
            self.rendered.push(view.scene_id.clone());
            Ok(())
        }

        fn select(&mut self, _labels: &[String]) -> Result<usize, TheatreError> {
            self.selections.pop_front().ok_or_else(TheatreError::cancelled)
        }

        fn choose_save_slot(
            &mut self,
            slots: &[SlotSummary],
        ) -> Result<Option<SaveRequest>, TheatreError> {
            self.menus_shown += 1;
            assert_eq!(slots.first().map(|summary| summary.slot), Some(1));
            assert_eq!(slots.len(), 9);
            self.save_requests
                .pop_front()
                .ok_or_else(TheatreError::cancelled)
        }

        fn notify(&mut self, notice: &Notice) -> Result<(), TheatreError> {
            self.notices.push(notice.clone());
            Ok(())
        }
    }

    fn vault_story() -> Story {
        Story::builder("vault", "The Vault")
            .description("Rob the vault or walk away.")
            .scene(
                Scene::new("start", "A quiet lobby.")
                    .with_choice(Choice::new("Enter the hall", "hall"))
                    .with_choice(Choice::new("Leave", "exit")),
            )
            .scene(
                Scene::new("hall", "A key glints on the floor.")
                    .with_effect(Effect::add_item("key"))
                    .with_choice(
                        Choice::new("Open the vault", "vault").when(Condition::has_item("key")),
                    )
                    .with_choice(Choice::new("Go back", "start")),
            )
            .scene(Scene::new("vault", "Gold everywhere.").ending())
            .scene(Scene::new("exit", "You walk away.").ending())
            .build()
            .expect("story should build")
    }

    fn controller(story: &Story) -> (tempfile::TempDir, GameController<'_>) {
        let root = tempfile::tempdir().expect("tempdir");
        let saves = SaveManager::new(root.path().join("saves"));
        (
            root,
            GameController::new(story, saves, ControllerConfig::default()),
        )
    }

    #[test]
    fn scripted_run_reaches_ending_and_autosaves() {
        let story = vault_story();
        let (_root, mut game) = controller(&story);
        let mut presenter = ScriptedPresenter::selecting(&[0, 0]);
        game.start_new();

        let outcome = game.run(&mut presenter).expect("run completes");
        assert_eq!(outcome, SessionOutcome::Ending("vault".to_string()));
        assert_eq!(presenter.rendered, vec!["start", "hall", "vault"]);
        assert_eq!(
            presenter.titles,
            vec![(
                "The Vault".to_string(),
                "Rob the vault or walk away.".to_string()
            )]
        );
        assert_eq!(game.state().choice_history().len(), 2);
        assert!(game.saves().has_autosave());
    }

    #[test]
    fn save_menu_returns_to_same_prompt_without_a_turn() {
        let story = vault_story();
        let (_root, mut game) = controller(&story);
        let mut presenter = ScriptedPresenter::selecting(&[2, 1]).with_save_request(Some(
            SaveRequest {
                slot: 4,
                name: Some("Lobby".to_string()),
            },
        ));
        game.start_new();

        let outcome = game.run(&mut presenter).expect("run completes");
        assert_eq!(outcome, SessionOutcome::Ending("exit".to_string()));
        assert_eq!(presenter.rendered, vec!["start", "exit"]);
        assert_eq!(presenter.menus_shown, 1);
        assert_eq!(
            presenter.notices,
            vec![Notice::Saved {
                slot: 4,
                name: "Lobby".to_string()
            }]
        );

        let metadata = game.saves().get_save_metadata(4).expect("slot 4 written");
        assert_eq!(metadata.current_scene, "start");
        assert_eq!(metadata.total_choices_made, 0);
        assert_eq!(game.state().choice_history().len(), 1);
        assert!(!game.saves().has_autosave());
    }

    #[test]
    fn out_of_range_selection_is_reprompted() {
        let story = vault_story();
        let (_root, mut game) = controller(&story);
        let mut presenter = ScriptedPresenter::selecting(&[7, 1]);
        game.start_new();

        let outcome = game.run(&mut presenter).expect("run completes");
        assert_eq!(outcome, SessionOutcome::Ending("exit".to_string()));
        assert_eq!(
            presenter.notices,
            vec![Notice::InvalidSelection {
                selected: 7,
                available: 3
            }]
        );
    }

    #[test]
    fn invalid_or_cancelled_slot_returns_to_prompt() {
        let story = vault_story();
        let (_root, mut game) = controller(&story);
        let mut presenter = ScriptedPresenter::selecting(&[2, 2, 1])
            .with_save_request(Some(SaveRequest {
                slot: 0,
                name: None,
            }))
            .with_save_request(None);
        game.start_new();

        game.run(&mut presenter).expect("run completes");
        assert_eq!(presenter.menus_shown, 2);
        assert_eq!(presenter.notices, vec![Notice::InvalidSlot { slot: 0 }]);
        assert!(game.saves().list_saves().iter().all(Option::is_none));
    }

    #[test]
    fn dead_end_is_reported_distinctly() {
        let story = Story::builder("stuck", "Stuck")
            .scene(
                Scene::new("cell", "Locked in.")
                    .with_choice(Choice::new("Unlock", "out").when(Condition::has_item("key"))),
            )
            .scene(Scene::new("out", "").ending())
            .build()
            .expect("story should build");
        let (_root, mut game) = controller(&story);
        let mut presenter = ScriptedPresenter::default();
        game.start_new();

        let outcome = game.run(&mut presenter).expect("dead end is an outcome");
        assert_eq!(outcome, SessionOutcome::DeadEnd("cell".to_string()));
        assert_eq!(
            presenter.notices,
            vec![Notice::DeadEnd {
                scene_id: "cell".to_string()
            }]
        );
    }

    #[test]
    fn cancellation_unwinds_without_saving() {
        let story = vault_story();
        let (_root, mut game) = controller(&story);
        let mut presenter = ScriptedPresenter::selecting(&[0]);
        game.start_new();

        let error = game.run(&mut presenter).expect_err("input runs out");
        assert_eq!(error.code, INPUT_CANCELLED);
        assert!(error.is_cancellation());
        let autosave = game.saves().load_game(AUTOSAVE_SLOT).expect("hall autosave");
        assert_eq!(autosave.current_scene, "hall");
        assert!(game.saves().get_save_metadata(1).is_none());
    }

    #[test]
    fn resumed_run_announces_resume() {
        let story = vault_story();
        let (_root, mut game) = controller(&story);
        game.resume(Default::default()).expect("resume");
        let mut presenter = ScriptedPresenter::selecting(&[1]);

        game.run(&mut presenter).expect("run completes");
        assert_eq!(presenter.titles[0].1, RESUME_SUBTITLE);
    }
}
