//! Agent configuration.

use crate::agent::error::AgentError;
use serde::{Deserialize, Serialize};

/// State an agent starts in unless configured otherwise.
pub const AGENT_STATE_IDLE: &str = "agent_state_idle";

/// Settings for a [`BaseAgent`](crate::agent::BaseAgent).
///
/// Every field has a default, so partial JSON documents are accepted.
///
/// # Example
///
/// ```rust
/// use agentmind::agent::AgentConfig;
///
/// let config = AgentConfig::from_json_str(r#"{ "reset_tree_on_enter": true }"#).unwrap();
/// assert_eq!(config.initial_state, "agent_state_idle");
/// assert!(config.reset_tree_on_enter);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// State entered by `BaseAgent::start`
    pub initial_state: String,

    /// Reset a state's behavior tree each time the state is entered, so a
    /// tree that completed on an earlier visit runs again
    pub reset_tree_on_enter: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            initial_state: AGENT_STATE_IDLE.to_string(),
            reset_tree_on_enter: false,
        }
    }
}

impl AgentConfig {
    pub fn from_json_str(json: &str) -> Result<Self, AgentError> {
        Ok(serde_json::from_str(json)?)
    }
}
