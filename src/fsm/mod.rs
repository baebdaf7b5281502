//! Finite-state machine for coarse behavioral modes.
//!
//! States and gating actions are registered by name; transitions are keyed
//! by `(from, event)`. `trigger` moves between states, `pop_state` returns
//! to the previous one.

mod error;
mod machine;
mod transition;

pub use error::FsmError;
pub use machine::{Fsm, Triggered};
pub use transition::Transition;
