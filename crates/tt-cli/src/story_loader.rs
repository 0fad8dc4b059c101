use std::path::{Path, PathBuf};

use tracing::warn;
use tt_core::TheatreError;
use tt_story::{bundled_story, discover_stories, Story, BUNDLED_STORY_ID};

use crate::map_cli_story_path;

const BUNDLED_REF_PREFIX: &str = "bundled:";
const FILE_REF_PREFIX: &str = "file:";

/// A story plus the ref that finds it again from a state file.
#[derive(Debug, Clone)]
pub(crate) struct LoadedStory {
    pub(crate) story_ref: String,
    pub(crate) story: Story,
}

/// `--story` wins, then the first story under `--stories-dir`, then the bundled story.
pub(crate) fn load_story(
    story_file: Option<&str>,
    stories_dir: Option<&str>,
) -> Result<LoadedStory, TheatreError> {
    if let Some(story_file) = story_file {
        return load_story_file(&resolve_path(story_file)?);
    }
    if let Some(stories_dir) = stories_dir {
        let stories_root = resolve_path(stories_dir)?;
        let Some(first) = discover_stories(&stories_root)?.into_iter().next() else {
            return Err(TheatreError::new(
                "CLI_STORY_NONE",
                format!("No story files found under {}", stories_root.display()),
            ));
        };
        return load_story_file(&first);
    }
    load_bundled_story(BUNDLED_STORY_ID)
}

/// Finds the story a save was made with: bundled stories first, then every
/// story file under `stories_dir`. Unreadable story files are skipped.
pub(crate) fn find_story_by_id(
    story_id: &str,
    stories_dir: Option<&str>,
) -> Result<Option<LoadedStory>, TheatreError> {
    if bundled_story(story_id)?.is_some() {
        return load_bundled_story(story_id).map(Some);
    }
    let Some(stories_dir) = stories_dir else {
        return Ok(None);
    };
    for path in discover_stories(&resolve_path(stories_dir)?)? {
        match load_story_file(&path) {
            Ok(loaded) if loaded.story.id() == story_id => return Ok(Some(loaded)),
            Ok(_) => {}
            Err(error) => warn!(path = %path.display(), %error, "skipping unreadable story"),
        }
    }
    Ok(None)
}

pub(crate) fn load_story_by_ref(story_ref: &str) -> Result<LoadedStory, TheatreError> {
    if let Some(id) = story_ref.strip_prefix(BUNDLED_REF_PREFIX) {
        return load_bundled_story(id);
    }
    if let Some(path) = story_ref.strip_prefix(FILE_REF_PREFIX) {
        return load_story_file(Path::new(path));
    }
    Err(TheatreError::new(
        "CLI_STORY_REF_INVALID",
        format!("Unsupported story ref: {story_ref}"),
    ))
}

fn load_bundled_story(id: &str) -> Result<LoadedStory, TheatreError> {
    let story = bundled_story(id)?.ok_or_else(|| {
        TheatreError::new(
            "CLI_STORY_REF_INVALID",
            format!("No bundled story with id `{id}`"),
        )
    })?;
    Ok(LoadedStory {
        story_ref: format!("{BUNDLED_REF_PREFIX}{id}"),
        story,
    })
}

fn load_story_file(path: &Path) -> Result<LoadedStory, TheatreError> {
    let story = Story::from_file(path)?;
    Ok(LoadedStory {
        story_ref: format!("{FILE_REF_PREFIX}{}", path.display()),
        story,
    })
}

fn resolve_path(raw: &str) -> Result<PathBuf, TheatreError> {
    let path = PathBuf::from(raw);
    if path.is_absolute() {
        return Ok(path);
    }
    Ok(std::env::current_dir()
        .map_err(map_cli_story_path)?
        .join(path))
}
