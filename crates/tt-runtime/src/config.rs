/// Tunables for a [`crate::GameController`] session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Scene transitions between autosaves. `0` disables autosave.
    pub autosave_interval: u32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            autosave_interval: 1,
        }
    }
}

impl ControllerConfig {
    pub fn with_autosave_interval(mut self, autosave_interval: u32) -> Self {
        self.autosave_interval = autosave_interval;
        self
    }

    pub fn autosave_enabled(&self) -> bool {
        self.autosave_interval > 0
    }
}
