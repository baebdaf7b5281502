//! Build errors for machine and tree builders.

use crate::behavior::{NodeId, TreeError};
use crate::fsm::FsmError;
use thiserror::Error;

/// Errors that can occur when building machines and trees.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("Initial state not specified. Call .initial(state) before .start()")]
    MissingInitialState,

    #[error("Initial state '{0}' is not registered. Call .state(name, state) first")]
    UnknownInitialState(String),

    #[error("Invalid machine definition: {0}")]
    Fsm(#[from] FsmError),

    #[error("Invalid tree definition: {0}")]
    Tree(#[from] TreeError),

    #[error("Composite node {0} was opened but never closed. Call .end()")]
    UnclosedComposite(NodeId),

    #[error(".end() called with no open composite")]
    UnbalancedEnd,
}
