use crate::tree::{
    ids::{ActionId, NodeId, StateKey},
    registry::StateRegistry,
};

#[derive(Debug, Clone)]
/// A trajectory prefix in the search tree.
///
/// Children are owned through the tree arena and indexed by action; the
/// parent link is a plain id and never keeps anything alive.
pub struct SearchNode {
    parent: Option<(NodeId, ActionId)>,
    children: Vec<NodeId>,
    reward: f64,
    accumulated_value: f64,
    depth: u64,
    done: bool,
    state_key: Option<StateKey>,
}

impl SearchNode {
    /// Create the root of a search tree for the given state.
    pub(crate) fn root(state_key: StateKey) -> Self {
        SearchNode {
            parent: None,
            children: Vec::new(),
            reward: 0.0,
            accumulated_value: 0.0,
            depth: 0,
            done: false,
            state_key: Some(state_key),
        }
    }

    /// Create a child whose transition has not been simulated yet.
    pub(crate) fn child(parent: NodeId, action: ActionId, depth: u64) -> Self {
        SearchNode {
            parent: Some((parent, action)),
            children: Vec::new(),
            reward: 0.0,
            accumulated_value: 0.0,
            depth,
            done: false,
            state_key: None,
        }
    }

    /// Store the outcome of the transition that produced this node.
    pub(crate) fn record_transition(
        &mut self,
        reward: f64,
        accumulated_value: f64,
        done: bool,
        state_key: StateKey,
    ) {
        self.reward = reward;
        self.accumulated_value = accumulated_value;
        self.done = done;
        self.state_key = Some(state_key);
    }

    pub(crate) fn push_child(&mut self, child: NodeId) {
        self.children.push(child);
    }

    /// Admissible score of the best trajectory through this node, in
    /// root-relative discounted units.
    pub fn value_upper_bound(&self, registry: &StateRegistry) -> f64 {
        let future = match self.state_key {
            Some(key) => registry.upper_bound(key),
            None => registry.max_value(),
        };
        self.accumulated_value + registry.discount_at(self.depth) * future
    }

    pub fn parent(&self) -> Option<(NodeId, ActionId)> {
        self.parent
    }

    /// Child ids in action order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Child reached by an action, if this node was expanded.
    pub fn child_for(&self, action: ActionId) -> Option<NodeId> {
        self.children.get(action.index()).copied()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Reward collected on the transition into this node (undiscounted).
    pub fn reward(&self) -> f64 {
        self.reward
    }

    /// Discounted return from the root to this node.
    pub fn accumulated_value(&self) -> f64 {
        self.accumulated_value
    }

    pub fn depth(&self) -> u64 {
        self.depth
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// State reached at this node; `None` until the transition is recorded.
    pub fn state_key(&self) -> Option<StateKey> {
        self.state_key
    }
}
