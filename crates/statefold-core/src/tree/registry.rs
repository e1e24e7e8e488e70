use std::collections::HashMap;

use crate::tree::ids::{NodeId, StateKey};

/// Outcome of offering a candidate bound to the registry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tightening {
    /// Whether the stored bound was replaced.
    pub improved: bool,
    /// How much the bound decreased; `0.0` when not improved.
    pub delta: f64,
}

impl Tightening {
    fn unchanged() -> Self {
        Tightening {
            improved: false,
            delta: 0.0,
        }
    }
}

#[derive(Debug, Clone)]
/// Index of tree nodes by the state they reach, plus the tightest known upper
/// bound on value-to-go for each state.
///
/// The node lists do not own anything; they are an overlay on the tree arena.
/// Bounds only ever decrease.
pub struct StateRegistry {
    gamma: f64,
    max_value: f64,
    nodes_by_state: HashMap<StateKey, Vec<NodeId>>,
    bound_by_state: HashMap<StateKey, f64>,
}

impl StateRegistry {
    /// Create an empty registry for discount factor `gamma` in `[0, 1)`.
    pub fn new(gamma: f64) -> Self {
        StateRegistry {
            gamma,
            max_value: 1.0 / (1.0 - gamma),
            nodes_by_state: HashMap::new(),
            bound_by_state: HashMap::new(),
        }
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    /// Value of an infinite stream of unit rewards, the bound of any unseen state.
    pub fn max_value(&self) -> f64 {
        self.max_value
    }

    /// `gamma^depth`, the factor bringing a value at `depth` back to the root.
    pub fn discount_at(&self, depth: u64) -> f64 {
        self.gamma.powi(i32::try_from(depth).unwrap_or(i32::MAX))
    }

    /// Record that `node` reaches `state_key`.
    ///
    /// Registering the same node twice duplicates it.
    pub fn register(&mut self, node: NodeId, state_key: StateKey) {
        self.nodes_by_state.entry(state_key).or_default().push(node);
    }

    /// Replace the bound of `state_key` if `candidate` is strictly smaller.
    pub fn tighten(&mut self, state_key: StateKey, candidate: f64) -> Tightening {
        let current = self.upper_bound(state_key);
        if candidate < current {
            self.bound_by_state.insert(state_key, candidate);
            Tightening {
                improved: true,
                delta: current - candidate,
            }
        } else {
            Tightening::unchanged()
        }
    }

    /// Current bound on value-to-go from `state_key`.
    pub fn upper_bound(&self, state_key: StateKey) -> f64 {
        self.bound_by_state
            .get(&state_key)
            .copied()
            .unwrap_or(self.max_value)
    }

    /// Nodes registered under `state_key`, in registration order.
    pub fn nodes_at(&self, state_key: StateKey) -> &[NodeId] {
        self.nodes_by_state
            .get(&state_key)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of distinct states reached so far.
    pub fn state_count(&self) -> usize {
        self.nodes_by_state.len()
    }

    /// Iterate over every state with a tightened bound.
    pub fn bounds(&self) -> impl Iterator<Item = (StateKey, f64)> + '_ {
        self.bound_by_state.iter().map(|(key, bound)| (*key, *bound))
    }
}
