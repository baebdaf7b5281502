//! Behavior trees for per-tick action selection.
//!
//! - [`BehaviorTree`]: arena of nodes ticked from a sequence root
//! - [`BehaviorNode`]: leaf (`Action`) or composite (`Sequence`,
//!   `Selector`, `Parallel`)
//! - [`LeafHandler`]: capability that runs leaf actions
//! - [`NodeState`]: `NotExecuted`, `Executing`, `Succeeded`, `Failed`

mod error;
mod node;
mod status;
mod tree;

pub use error::TreeError;
pub use node::{ActionId, BehaviorNode, LeafHandler, NodeId, NodeMeta, TreeId};
pub use status::{NodeKind, NodeState};
pub use tree::{BehaviorTree, ROOT_NODE_ID};
