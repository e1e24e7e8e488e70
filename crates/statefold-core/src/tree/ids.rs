use std::fmt;

use serde::Serialize;

/// Index of a node inside the search tree arena.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in the arena.
    pub fn index(&self) -> usize {
        self.0
    }
}

impl From<usize> for NodeId {
    fn from(value: usize) -> Self {
        NodeId(value)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Canonical key of an external state.
///
/// Two nodes holding equal keys are treated as the same state and share one
/// value bound. The key must be derived by an explicit canonicalization (see
/// `statefold_mdp::StateInterner`) that is deterministic and collision-free
/// for the states of a domain; it must not depend on how the state was reached.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct StateKey(u64);

impl StateKey {
    /// Return the internal numeric representation of this key.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl From<u64> for StateKey {
    fn from(value: u64) -> Self {
        StateKey(value)
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s{}", self.0)
    }
}

/// Index of an action in the action space of a state.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ActionId(usize);

impl ActionId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl From<usize> for ActionId {
    fn from(value: usize) -> Self {
        ActionId(value)
    }
}
