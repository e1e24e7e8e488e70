use thiserror::Error;

use crate::tree::ids::{ActionId, NodeId};

/// Error type for tree construction and planning operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TreeError {
    /// Attempted to access a node id that does not exist in the arena.
    #[error("missing node with id {}", node_id.index())]
    MissingNode { node_id: NodeId },

    /// Selection ran with no expandable node left.
    #[error("frontier is empty after {expansions} expansions; no node left to expand")]
    EmptyFrontier { expansions: usize },

    /// A node can only be expanded once.
    #[error("node {} has already been expanded", node_id.index())]
    AlreadyExpanded { node_id: NodeId },

    /// The node was created but its transition was never recorded.
    #[error("node {} has no state key recorded", node_id.index())]
    UnresolvedState { node_id: NodeId },

    /// `on_transition` was called for the root or for a node whose
    /// transition was already recorded.
    #[error("node {} already has a recorded transition", node_id.index())]
    AlreadyResolved { node_id: NodeId },

    /// Rewards must be normalized to `[0, 1]` for the bounds to stay admissible.
    #[error(
        "reward {reward} for action {} from node {} is outside [0, 1]",
        action.index(),
        node_id.index()
    )]
    RewardOutOfRange {
        node_id: NodeId,
        action: ActionId,
        reward: f64,
    },
}
