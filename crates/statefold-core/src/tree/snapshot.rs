use serde::Serialize;

use crate::tree::{
    ids::{ActionId, NodeId, StateKey},
    planner::AggregatingPlanner,
};

const SNAPSHOT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize)]
pub struct TreeSnapshot {
    pub schema_version: u32,
    pub root_node_id: NodeId,
    pub node_count: usize,
    pub state_count: usize,
    pub frontier_len: usize,
    pub nodes: Vec<NodeSnapshot>,
    /// Tightened state bounds, sorted by key. Unlisted states are at the maximum.
    pub bounds: Vec<StateBoundSnapshot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NodeSnapshot {
    pub node_id: NodeId,
    pub state_key: Option<StateKey>,
    pub depth: u64,
    pub reward: f64,
    pub accumulated_value: f64,
    pub value_upper_bound: f64,
    pub done: bool,
    pub in_frontier: bool,
    pub parent_node_id: Option<NodeId>,
    pub parent_action_id: Option<ActionId>,
    pub children: Vec<NodeId>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StateBoundSnapshot {
    pub state_key: StateKey,
    pub upper_bound: f64,
}

impl TreeSnapshot {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl AggregatingPlanner {
    /// Capture the current tree, frontier and registry bounds.
    pub fn snapshot(&self) -> TreeSnapshot {
        let tree = self.tree();
        let registry = self.registry();

        let nodes = tree
            .nodes()
            .map(|(node_id, node)| NodeSnapshot {
                node_id,
                state_key: node.state_key(),
                depth: node.depth(),
                reward: node.reward(),
                accumulated_value: node.accumulated_value(),
                value_upper_bound: node.value_upper_bound(registry),
                done: node.is_done(),
                in_frontier: self.frontier().contains(node_id),
                parent_node_id: node.parent().map(|(parent, _)| parent),
                parent_action_id: node.parent().map(|(_, action)| action),
                children: node.children().to_vec(),
            })
            .collect();

        let mut bounds: Vec<StateBoundSnapshot> = registry
            .bounds()
            .map(|(state_key, upper_bound)| StateBoundSnapshot {
                state_key,
                upper_bound,
            })
            .collect();
        bounds.sort_by_key(|bound| bound.state_key);

        TreeSnapshot {
            schema_version: SNAPSHOT_SCHEMA_VERSION,
            root_node_id: tree.root_id(),
            node_count: tree.node_count(),
            state_count: registry.state_count(),
            frontier_len: self.frontier().len(),
            nodes,
            bounds,
        }
    }
}
