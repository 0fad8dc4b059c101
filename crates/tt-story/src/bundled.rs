use tt_core::TheatreError;

use crate::Story;

pub const BUNDLED_STORY_ID: &str = "the_last_case";

const THE_LAST_CASE: &str = include_str!("../stories/the_last_case.story.json");

/// Stories compiled into the binary, keyed by story id.
pub fn bundled_stories() -> Result<Vec<Story>, TheatreError> {
    Ok(vec![Story::from_json_str(THE_LAST_CASE)?])
}

pub fn bundled_story(id: &str) -> Result<Option<Story>, TheatreError> {
    Ok(bundled_stories()?
        .into_iter()
        .find(|story| story.id() == id))
}
