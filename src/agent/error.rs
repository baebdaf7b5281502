//! Agent binding errors.

use crate::behavior::ActionId;
use crate::fsm::FsmError;
use thiserror::Error;

/// Errors that can occur when wiring or driving an agent.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error(transparent)]
    Fsm(#[from] FsmError),

    #[error("A leaf handler for action {0} is already registered")]
    HandlerExists(ActionId),

    #[error("Invalid agent configuration: {0}")]
    Config(#[from] serde_json::Error),
}
