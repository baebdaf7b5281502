//! Agentmind: tick-driven decision making for game agents
//!
//! Agentmind pairs a finite-state machine for coarse behavioral modes with
//! behavior trees for per-tick action selection inside a mode. Nothing runs
//! on its own: the caller ticks the machine once per frame and fires events
//! as they happen.
//!
//! # Core Concepts
//!
//! - **State machine**: named states, gated transitions and a history stack
//!   via [`Fsm`]
//! - **Behavior trees**: sequence, selector and parallel composites over
//!   leaf actions via [`BehaviorTree`], resumed across ticks
//! - **Agents**: closure-based wiring of both via [`BaseAgent`]
//!
//! # Example
//!
//! ```rust
//! use agentmind::behavior::{NodeMeta, NodeState};
//! use agentmind::builder::{FsmBuilder, TreeBuilder};
//! use agentmind::core::{NoopState, Param};
//! use agentmind::fsm::Triggered;
//!
//! let mut fsm = FsmBuilder::new()
//!     .state("Patrol", NoopState)
//!     .state("Chase", NoopState)
//!     .action("close_enough", |_: &str, params: &[Param]| {
//!         params.first().and_then(Param::as_float).unwrap_or(f64::MAX) < 10.0
//!     })
//!     .gated_transition("Patrol", "spotted", "Chase", "close_enough")
//!     .initial("Patrol")
//!     .start()
//!     .unwrap();
//!
//! assert_eq!(fsm.trigger("spotted", &[Param::from(25.0)]), Ok(Triggered::Vetoed));
//! assert_eq!(fsm.trigger("spotted", &[Param::from(4.0)]), Ok(Triggered::Transitioned));
//! assert_eq!(fsm.current_state(), Some("Chase"));
//!
//! let mut tree = TreeBuilder::new(1)
//!     .leaf(2, 100, 0, vec![])
//!     .build()
//!     .unwrap();
//! tree.execute(&mut |_: &mut NodeMeta, _: &[Param]| NodeState::Succeeded);
//! assert_eq!(tree.state(), NodeState::Succeeded);
//! ```

pub mod agent;
pub mod behavior;
pub mod builder;
pub mod core;
pub mod fsm;

// Re-export commonly used types
pub use agent::{Agent, AgentConfig, BaseAgent};
pub use behavior::{BehaviorNode, BehaviorTree, LeafHandler, NodeState};
pub use crate::core::{Action, Param, State, StateHistory};
pub use fsm::{Fsm, FsmError, Triggered};
