//! Agent binding layer.
//!
//! Wires a [`Fsm`](crate::fsm::Fsm) to caller closures and to one behavior
//! tree per state:
//! - state hooks run closures from [`StateHooks`]
//! - a state without an update closure ticks its tree on every update
//! - leaves find their handler by action id in a shared [`LeafRegistry`]

mod base;
mod config;
mod error;
mod registry;

pub use base::{Agent, BaseAgent, StateHooks};
pub use config::{AgentConfig, AGENT_STATE_IDLE};
pub use error::AgentError;
pub use registry::LeafRegistry;
