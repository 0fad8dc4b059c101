mod bundled;
mod connectivity;
mod document;
mod graph;

pub use bundled::{bundled_stories, bundled_story, BUNDLED_STORY_ID};
pub use connectivity::{check_connectivity, ConnectivityReport, MissingTarget};
pub use document::{discover_stories, StoryDocument, STORY_FILE_SUFFIX};
pub use graph::{Story, StoryBuilder};

pub const STORY_SCENE_MISSING: &str = "STORY_SCENE_MISSING";
pub const STORY_ENTRY_MISSING: &str = "STORY_ENTRY_MISSING";
pub const STORY_DUPLICATE_SCENE: &str = "STORY_DUPLICATE_SCENE";
pub const STORY_PARSE: &str = "STORY_PARSE";
pub const STORY_READ: &str = "STORY_READ";
pub const STORY_NOT_FOUND: &str = "STORY_NOT_FOUND";
