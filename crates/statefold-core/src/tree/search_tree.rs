use crate::tree::{
    arena::Arena,
    error::TreeError,
    ids::{ActionId, NodeId, StateKey},
    node::SearchNode,
    registry::StateRegistry,
};

#[derive(Debug, Clone)]
/// Owns every node of the trajectory tree (root is always at index 0).
pub struct Tree {
    arena: Arena<SearchNode>,
}

impl Tree {
    /// Create a tree with a single root node.
    pub fn new(root_state_key: StateKey) -> Self {
        let mut arena = Arena::new();
        let _ = arena.allocate(SearchNode::root(root_state_key));
        Tree { arena }
    }

    /// Discard every node and start over from a new root.
    pub fn reset(&mut self, root_state_key: StateKey) {
        self.arena.clear();
        let _ = self.arena.allocate(SearchNode::root(root_state_key));
    }

    pub fn root_id(&self) -> NodeId {
        NodeId::from(0)
    }

    /// Return how many nodes exist in the tree arena.
    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    pub fn node(&self, node_id: NodeId) -> Result<&SearchNode, TreeError> {
        self.arena
            .get(node_id)
            .ok_or(TreeError::MissingNode { node_id })
    }

    pub(crate) fn node_mut(&mut self, node_id: NodeId) -> Result<&mut SearchNode, TreeError> {
        self.arena
            .get_mut(node_id)
            .ok_or(TreeError::MissingNode { node_id })
    }

    /// All nodes with their ids, in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &SearchNode)> {
        self.arena.iter_ids()
    }

    /// Allocate an unsimulated child of `parent` for `action`.
    ///
    /// Children must be added in action order, starting at action 0.
    pub(crate) fn add_child(&mut self, parent: NodeId, action: ActionId) -> Result<NodeId, TreeError> {
        let depth = self.node(parent)?.depth() + 1;
        let child_id = self.arena.allocate(SearchNode::child(parent, action, depth));
        self.node_mut(parent)?.push_child(child_id);
        Ok(child_id)
    }

    /// Child of `node_id` with the highest value upper bound.
    /// The lowest action wins ties.
    pub fn best_child(
        &self,
        node_id: NodeId,
        registry: &StateRegistry,
    ) -> Result<Option<(ActionId, NodeId)>, TreeError> {
        let node = self.node(node_id)?;
        let mut best: Option<(ActionId, NodeId, f64)> = None;

        for (idx, child_id) in node.children().iter().copied().enumerate() {
            let score = self.node(child_id)?.value_upper_bound(registry);
            best = match best {
                Some((_, _, best_score)) if best_score >= score => best,
                _ => Some((ActionId::from(idx), child_id, score)),
            };
        }

        Ok(best.map(|(action, child, _)| (action, child)))
    }

    /// Actions leading from the root to `node_id`.
    pub fn path(&self, node_id: NodeId) -> Result<Vec<ActionId>, TreeError> {
        let mut actions = Vec::new();
        let mut current = self.node(node_id)?;
        while let Some((parent, action)) = current.parent() {
            actions.push(action);
            current = self.node(parent)?;
        }
        actions.reverse();
        Ok(actions)
    }

    /// Follow the best child from the root until reaching a leaf.
    pub fn extract_plan(&self, registry: &StateRegistry) -> Result<Vec<ActionId>, TreeError> {
        let mut actions = Vec::new();
        let mut current = self.root_id();
        while let Some((action, child)) = self.best_child(current, registry)? {
            actions.push(action);
            current = child;
        }
        Ok(actions)
    }
}
