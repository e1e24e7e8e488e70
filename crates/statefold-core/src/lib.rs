mod tree;

pub use tree::config::{PlannerConfig, PlannerConfigError};
pub use tree::error::TreeError;
pub use tree::frontier::Frontier;
pub use tree::ids::{ActionId, NodeId, StateKey};
pub use tree::node::SearchNode;
pub use tree::planner::{AggregatingPlanner, Expansion, IterationMetrics, Plan, PlanMetrics};
pub use tree::registry::{StateRegistry, Tightening};
pub use tree::search_tree::Tree;
pub use tree::snapshot::{NodeSnapshot, StateBoundSnapshot, TreeSnapshot};
