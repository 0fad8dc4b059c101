use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tt_core::{Scene, TheatreError};
use walkdir::WalkDir;

use crate::{Story, StoryBuilder, STORY_NOT_FOUND, STORY_PARSE, STORY_READ};

pub const STORY_FILE_SUFFIX: &str = ".story.json";

/// JSON authoring format for a story.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryDocument {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_scene: Option<String>,
    pub scenes: Vec<Scene>,
}

impl StoryDocument {
    pub fn into_story(self) -> Result<Story, TheatreError> {
        let mut builder = StoryBuilder::new(self.id, self.title).description(self.description);
        if let Some(entry) = self.entry_scene {
            builder = builder.entry(entry);
        }
        self.scenes
            .into_iter()
            .fold(builder, StoryBuilder::scene)
            .build()
    }
}

impl Story {
    pub fn from_json_str(source: &str) -> Result<Story, TheatreError> {
        let document: StoryDocument = serde_json::from_str(source)
            .map_err(|error| TheatreError::new(STORY_PARSE, error.to_string()))?;
        document.into_story()
    }

    pub fn from_file(path: &Path) -> Result<Story, TheatreError> {
        if !path.exists() {
            return Err(TheatreError::new(
                STORY_NOT_FOUND,
                format!("Story file does not exist: {}", path.display()),
            ));
        }
        let raw = fs::read_to_string(path).map_err(|error| {
            TheatreError::new(STORY_READ, format!("{}: {}", path.display(), error))
        })?;
        let story = Self::from_json_str(&raw).map_err(|error| {
            TheatreError::new(error.code, format!("{}: {}", path.display(), error.message))
        })?;
        tracing::debug!(
            story = story.id(),
            scenes = story.scene_count(),
            path = %path.display(),
            "story loaded"
        );
        Ok(story)
    }
}

/// Finds `*.story.json` files under `dir`, sorted by path.
pub fn discover_stories(dir: &Path) -> Result<Vec<PathBuf>, TheatreError> {
    if !dir.is_dir() {
        return Err(TheatreError::new(
            STORY_NOT_FOUND,
            format!("Stories directory does not exist: {}", dir.display()),
        ));
    }

    let mut stories = WalkDir::new(dir)
        .follow_links(false)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.to_string_lossy().ends_with(STORY_FILE_SUFFIX))
        .collect::<Vec<_>>();
    stories.sort();
    Ok(stories)
}
