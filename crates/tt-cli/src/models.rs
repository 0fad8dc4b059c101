use serde::{Deserialize, Serialize};
use tt_core::GameStateSnapshot;

pub(crate) const AGENT_STATE_SCHEMA: &str = "theatre-agent-state.v1";

/// State file exchanged between `agent` invocations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AgentState {
    pub(crate) schema_version: String,
    pub(crate) story_ref: String,
    pub(crate) snapshot: GameStateSnapshot,
}

impl AgentState {
    pub(crate) fn new(story_ref: &str, snapshot: GameStateSnapshot) -> Self {
        Self {
            schema_version: AGENT_STATE_SCHEMA.to_string(),
            story_ref: story_ref.to_string(),
            snapshot,
        }
    }
}
