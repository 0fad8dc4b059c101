use std::collections::HashMap;

use tt_core::{Choice, GameState, Scene, TheatreError};

use crate::{STORY_DUPLICATE_SCENE, STORY_ENTRY_MISSING};

/// Immutable scene table plus its entry point.
///
/// Scenes live in an arena in authoring order and are addressed by id.
/// Nothing mutates a `Story` after [`StoryBuilder::build`].
#[derive(Debug, Clone)]
pub struct Story {
    id: String,
    title: String,
    description: String,
    entry_scene: String,
    scenes: Vec<Scene>,
    index: HashMap<String, usize>,
}

impl Story {
    pub fn builder(id: impl Into<String>, title: impl Into<String>) -> StoryBuilder {
        StoryBuilder::new(id, title)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn entry_scene(&self) -> &str {
        &self.entry_scene
    }

    pub fn scene_count(&self) -> usize {
        self.scenes.len()
    }

    pub fn scenes(&self) -> impl Iterator<Item = &Scene> {
        self.scenes.iter()
    }

    /// Absent ids return `None`; callers decide whether that is fatal.
    pub fn get_scene(&self, id: &str) -> Option<&Scene> {
        self.index.get(id).map(|position| &self.scenes[*position])
    }

    /// Choices whose condition holds for `state`, in authored order.
    pub fn available_choices<'a>(&self, scene: &'a Scene, state: &GameState) -> Vec<&'a Choice> {
        scene
            .choices
            .iter()
            .filter(|choice| choice.is_available(state))
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct StoryBuilder {
    id: String,
    title: String,
    description: String,
    entry_scene: Option<String>,
    scenes: Vec<Scene>,
}

impl StoryBuilder {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            entry_scene: None,
            scenes: Vec::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn entry(mut self, scene_id: impl Into<String>) -> Self {
        self.entry_scene = Some(scene_id.into());
        self
    }

    pub fn scene(mut self, scene: Scene) -> Self {
        self.scenes.push(scene);
        self
    }

    pub fn build(self) -> Result<Story, TheatreError> {
        let mut index = HashMap::with_capacity(self.scenes.len());
        for (position, scene) in self.scenes.iter().enumerate() {
            if index.insert(scene.id.clone(), position).is_some() {
                return Err(TheatreError::at_scene(
                    STORY_DUPLICATE_SCENE,
                    format!(
                        "Story \"{}\" defines scene \"{}\" more than once.",
                        self.id, scene.id
                    ),
                    scene.id.clone(),
                ));
            }
        }

        // An unset entry falls back to the first authored scene.
        let entry_scene = match self.entry_scene {
            Some(entry) => entry,
            None => self
                .scenes
                .first()
                .map(|scene| scene.id.clone())
                .unwrap_or_default(),
        };
        if !index.contains_key(&entry_scene) {
            return Err(TheatreError::new(
                STORY_ENTRY_MISSING,
                format!(
                    "Story \"{}\" entry scene \"{}\" is not defined.",
                    self.id, entry_scene
                ),
            ));
        }

        Ok(Story {
            id: self.id,
            title: self.title,
            description: self.description,
            entry_scene,
            scenes: self.scenes,
            index,
        })
    }
}
