use tt_core::{Scene, SceneContent};

/// What a presenter needs to draw one scene.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneView {
    pub scene_id: String,
    pub content: SceneContent,
    pub is_ending: bool,
}

impl SceneView {
    pub(crate) fn of(scene: &Scene) -> Self {
        Self {
            scene_id: scene.id.clone(),
            content: scene.content.clone(),
            is_ending: scene.is_ending,
        }
    }
}

/// `index` is the position among the currently available choices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceView {
    pub index: usize,
    pub text: String,
}

/// The next point where the engine stops and waits.
#[derive(Debug, Clone, PartialEq)]
pub enum Boundary {
    Choices {
        view: SceneView,
        choices: Vec<ChoiceView>,
    },
    Ending {
        view: SceneView,
    },
    DeadEnd {
        view: SceneView,
    },
}

impl Boundary {
    pub fn view(&self) -> &SceneView {
        match self {
            Self::Choices { view, .. } | Self::Ending { view } | Self::DeadEnd { view } => view,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Choices { .. })
    }
}

/// How an interactive session stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    Ending(String),
    DeadEnd(String),
}
