pub mod error;
pub mod scene;
pub mod state;
pub mod value;

pub use error::{TheatreError, INPUT_CANCELLED};
pub use scene::*;
pub use state::*;
pub use value::*;
