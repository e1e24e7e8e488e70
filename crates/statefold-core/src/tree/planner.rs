use tracing::{Level, debug, warn};

use crate::tree::{
    config::{PlannerConfig, PlannerConfigError},
    error::TreeError,
    frontier::Frontier,
    ids::{ActionId, NodeId, StateKey},
    registry::StateRegistry,
    search_tree::Tree,
};

/// Metrics emitted after every expansion.
#[derive(Debug, Clone, Copy)]
pub struct IterationMetrics {
    pub expanded: NodeId,
    pub state_key: StateKey,
    pub children_created: usize,
    /// Backup attempts on nodes with children, see `AggregatingPlanner::backup_to_root`.
    pub updated_nodes: usize,
    pub pruned_leaves: usize,
    pub budget_spent: usize,
}

/// Aggregate metrics for a complete plan call.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanMetrics {
    pub budget: usize,
    pub budget_spent: usize,
    pub expansions: usize,
    pub states_explored: usize,
    pub updated_nodes: usize,
    pub pruned_leaves: usize,
}

impl PlanMetrics {
    fn new(budget: usize) -> Self {
        PlanMetrics {
            budget,
            budget_spent: 0,
            expansions: 0,
            states_explored: 0,
            updated_nodes: 0,
            pruned_leaves: 0,
        }
    }

    fn record(&mut self, metrics: &IterationMetrics) {
        self.expansions += 1;
        self.budget_spent = metrics.budget_spent;
        self.updated_nodes += metrics.updated_nodes;
        self.pruned_leaves += metrics.pruned_leaves;
    }
}

/// Result of a plan call.
#[derive(Debug, Clone)]
pub struct Plan {
    /// Greedy action sequence from the root, by value upper bound.
    pub actions: Vec<ActionId>,
    pub metrics: PlanMetrics,
}

impl Plan {
    /// Action to take now.
    pub fn first_action(&self) -> Option<ActionId> {
        self.actions.first().copied()
    }
}

/// Counts from a single expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expansion {
    pub children_created: usize,
    pub pruned_leaves: usize,
}

/// Optimistic best-first planner for deterministic domains that shares value
/// bounds between all nodes reaching the same state.
///
/// The environment is only reached through two closures: `num_actions(state)`
/// and `step(state, action) -> (next_state, reward, done)`. Rewards must lie in
/// `[0, 1]`.
#[derive(Debug, Clone)]
pub struct AggregatingPlanner {
    config: PlannerConfig,
    tree: Tree,
    registry: StateRegistry,
    frontier: Frontier,
    expansions: usize,
}

impl AggregatingPlanner {
    /// Create a planner. The search starts from `reset` or `plan`; until then
    /// the frontier is empty.
    pub fn new(config: PlannerConfig) -> Result<Self, PlannerConfigError> {
        config.validate()?;
        Ok(AggregatingPlanner {
            registry: StateRegistry::new(config.gamma),
            tree: Tree::new(StateKey::from(0)),
            frontier: Frontier::new(),
            expansions: 0,
            config,
        })
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn registry(&self) -> &StateRegistry {
        &self.registry
    }

    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    /// Start a fresh search rooted at `root_state_key`.
    pub fn reset(&mut self, root_state_key: StateKey) {
        self.tree.reset(root_state_key);
        self.registry = StateRegistry::new(self.config.gamma);
        self.frontier.clear();
        self.expansions = 0;

        let root = self.tree.root_id();
        self.registry.register(root, root_state_key);
        self.frontier.insert(root);
    }

    /// Upper bound of a node's best trajectory, in root-relative units.
    pub fn value_upper_bound(&self, node_id: NodeId) -> Result<f64, TreeError> {
        Ok(self.tree.node(node_id)?.value_upper_bound(&self.registry))
    }

    /// Frontier node with the highest value upper bound; the earliest inserted
    /// wins ties.
    pub fn select_leaf(&self) -> Result<NodeId, TreeError> {
        let mut best: Option<(NodeId, f64)> = None;
        for node_id in self.frontier.iter() {
            let score = self.value_upper_bound(node_id)?;
            best = match best {
                Some((_, best_score)) if best_score >= score => best,
                _ => Some((node_id, score)),
            };
        }

        best.map(|(node_id, _)| node_id)
            .ok_or(TreeError::EmptyFrontier {
                expansions: self.expansions,
            })
    }

    /// Create one child per action of `node_id` and record each transition.
    ///
    /// All actions are stepped and checked before anything changes; an
    /// out-of-range reward leaves the node expandable. Then the node leaves the
    /// frontier and every child joins it before its transition is recorded,
    /// so pruning sees it.
    pub fn expand<FNum, FStep>(
        &mut self,
        node_id: NodeId,
        num_actions: &mut FNum,
        step: &mut FStep,
    ) -> Result<Expansion, TreeError>
    where
        FNum: FnMut(StateKey) -> usize,
        FStep: FnMut(StateKey, ActionId) -> (StateKey, f64, bool),
    {
        let state_key = self.resolved_state(node_id)?;
        let n = num_actions(state_key);
        self.expand_with(node_id, n, step)
    }

    fn expand_with<FStep>(
        &mut self,
        node_id: NodeId,
        n: usize,
        step: &mut FStep,
    ) -> Result<Expansion, TreeError>
    where
        FStep: FnMut(StateKey, ActionId) -> (StateKey, f64, bool),
    {
        let (state_key, is_leaf, is_done) = {
            let node = self.tree.node(node_id)?;
            let key = node
                .state_key()
                .ok_or(TreeError::UnresolvedState { node_id })?;
            (key, node.is_leaf(), node.is_done())
        };
        if !is_leaf {
            return Err(TreeError::AlreadyExpanded { node_id });
        }
        if is_done {
            warn!(node = %node_id, state = %state_key, "expanding a terminal state");
        }

        // Every transition is simulated and validated before the tree changes.
        let mut transitions = Vec::with_capacity(n);
        for idx in 0..n {
            let action = ActionId::from(idx);
            let (next_key, reward, done) = step(state_key, action);
            check_reward(node_id, action, reward)?;
            transitions.push((action, next_key, reward, done));
        }

        self.frontier.remove(node_id);

        let mut pruned_leaves = 0;
        for (action, next_key, reward, done) in transitions {
            let child = self.tree.add_child(node_id, action)?;
            self.frontier.insert(child);
            pruned_leaves += self.on_transition(child, reward, done, next_key)?;
        }

        self.expansions += 1;
        Ok(Expansion {
            children_created: n,
            pruned_leaves,
        })
    }

    /// Record the transition that produced `node_id` and fold it into the
    /// registry. Returns the number of frontier nodes pruned.
    ///
    /// Must be called exactly once per node; the root and nodes whose
    /// transition is already recorded are rejected with `AlreadyResolved`.
    pub fn on_transition(
        &mut self,
        node_id: NodeId,
        reward: f64,
        done: bool,
        state_key: StateKey,
    ) -> Result<usize, TreeError> {
        let node = self.tree.node(node_id)?;
        if node.state_key().is_some() {
            return Err(TreeError::AlreadyResolved { node_id });
        }
        // Only the root lacks a parent, and the root is always resolved.
        let (parent_id, action) = node
            .parent()
            .ok_or(TreeError::AlreadyResolved { node_id })?;
        check_reward(parent_id, action, reward)?;

        let parent = self.tree.node(parent_id)?;
        let accumulated_value =
            parent.accumulated_value() + self.registry.discount_at(parent.depth()) * reward;
        self.tree
            .node_mut(node_id)?
            .record_transition(reward, accumulated_value, done, state_key);

        self.registry.register(node_id, state_key);

        // Only informative the first time the state is seen.
        let estimate = if done { 0.0 } else { self.registry.max_value() };
        let _ = self.registry.tighten(state_key, estimate);

        if self.config.prune_suboptimal_leaves {
            self.prune_leaves(state_key)
        } else {
            Ok(0)
        }
    }

    /// Keep only the best frontier leaf among those reaching `state_key`.
    fn prune_leaves(&mut self, state_key: StateKey) -> Result<usize, TreeError> {
        let mut leaves = Vec::new();
        let mut best: Option<(NodeId, f64)> = None;

        for node_id in self.registry.nodes_at(state_key).iter().copied() {
            let node = self.tree.node(node_id)?;
            if !node.is_leaf() || !self.frontier.contains(node_id) {
                continue;
            }
            let score = node.value_upper_bound(&self.registry);
            best = match best {
                Some((_, best_score)) if best_score >= score => best,
                _ => Some((node_id, score)),
            };
            leaves.push(node_id);
        }

        let mut pruned = 0;
        for node_id in leaves {
            if best.map(|(keep, _)| keep) != Some(node_id) && self.frontier.remove(node_id) {
                pruned += 1;
            }
        }
        Ok(pruned)
    }

    /// Tighten the bound of `node_id`'s state from its best child and carry
    /// any improvement to its ancestors and, if enabled, to the parents of
    /// every other node reaching the same state.
    ///
    /// Returns the number of visited nodes that had children, whether or not
    /// their bound changed. The same ancestor may be visited several times.
    pub fn backup_to_root(&mut self, node_id: NodeId) -> Result<usize, TreeError> {
        let gamma = self.config.gamma;
        let mut updated_nodes = 0;
        let mut pending = vec![node_id];

        // Depth-first in the order of the recursive formulation: own parent
        // chain first, then aggregated peers in registration order.
        while let Some(current) = pending.pop() {
            let Some((_, best_child)) = self.tree.best_child(current, &self.registry)? else {
                continue;
            };
            updated_nodes += 1;

            let child = self.tree.node(best_child)?;
            let child_key = child.state_key().ok_or(TreeError::UnresolvedState {
                node_id: best_child,
            })?;
            let candidate = child.reward() + gamma * self.registry.upper_bound(child_key);

            let node = self.tree.node(current)?;
            let state_key = node
                .state_key()
                .ok_or(TreeError::UnresolvedState { node_id: current })?;
            let tightening = self.registry.tighten(state_key, candidate);

            if !tightening.improved || tightening.delta <= self.config.stopping_accuracy {
                continue;
            }

            if self.config.backup_aggregated_nodes {
                for peer in self.registry.nodes_at(state_key).iter().rev().copied() {
                    if peer == current {
                        continue;
                    }
                    if let Some((parent, _)) = self.tree.node(peer)?.parent() {
                        pending.push(parent);
                    }
                }
            }
            if let Some((parent, _)) = node.parent() {
                pending.push(parent);
            }
        }

        Ok(updated_nodes)
    }

    /// Greedy action sequence from the root.
    pub fn extract_plan(&self) -> Result<Vec<ActionId>, TreeError> {
        self.tree.extract_plan(&self.registry)
    }

    /// Search from `root_state_key` until the budget is spent and return the plan.
    pub fn plan<FNum, FStep>(
        &mut self,
        root_state_key: StateKey,
        num_actions: FNum,
        step: FStep,
    ) -> Result<Plan, TreeError>
    where
        FNum: FnMut(StateKey) -> usize,
        FStep: FnMut(StateKey, ActionId) -> (StateKey, f64, bool),
    {
        self.plan_with_hook(root_state_key, num_actions, step, |_| {})
    }

    /// Plan and invoke a callback after each expansion.
    pub fn plan_with_hook<FNum, FStep, FHook>(
        &mut self,
        root_state_key: StateKey,
        mut num_actions: FNum,
        mut step: FStep,
        mut on_iteration: FHook,
    ) -> Result<Plan, TreeError>
    where
        FNum: FnMut(StateKey) -> usize,
        FStep: FnMut(StateKey, ActionId) -> (StateKey, f64, bool),
        FHook: FnMut(&IterationMetrics),
    {
        self.reset(root_state_key);
        let budget = self.config.budget;
        let mut metrics = PlanMetrics::new(budget);
        let mut spent = 0;

        while spent < budget {
            let leaf = self.select_leaf()?;
            let state_key = self.resolved_state(leaf)?;
            let n = num_actions(state_key);
            // Each simulated transition costs one unit; action-less nodes still
            // cost one so the loop always progresses.
            let cost = n.max(1);
            if spent + cost > budget {
                break;
            }

            let expansion = self.expand_with(leaf, n, &mut step)?;
            let updated_nodes = self.backup_to_root(leaf)?;
            spent += cost;

            if tracing::enabled!(Level::DEBUG) {
                let path = self.tree.path(leaf)?;
                debug!(
                    updated_nodes,
                    state = %state_key,
                    ?path,
                    "backed up expanded node"
                );
            }

            let iteration = IterationMetrics {
                expanded: leaf,
                state_key,
                children_created: expansion.children_created,
                updated_nodes,
                pruned_leaves: expansion.pruned_leaves,
                budget_spent: spent,
            };
            on_iteration(&iteration);
            metrics.record(&iteration);
        }

        metrics.states_explored = self.registry.state_count();
        debug!(
            expansions = metrics.expansions,
            states_explored = metrics.states_explored,
            budget_spent = metrics.budget_spent,
            "planning finished"
        );

        Ok(Plan {
            actions: self.extract_plan()?,
            metrics,
        })
    }

    fn resolved_state(&self, node_id: NodeId) -> Result<StateKey, TreeError> {
        self.tree
            .node(node_id)?
            .state_key()
            .ok_or(TreeError::UnresolvedState { node_id })
    }
}

/// Rewards must lie in `[0, 1]` for `max_value` to bound every return.
fn check_reward(node_id: NodeId, action: ActionId, reward: f64) -> Result<(), TreeError> {
    if (0.0..=1.0).contains(&reward) {
        Ok(())
    } else {
        Err(TreeError::RewardOutOfRange {
            node_id,
            action,
            reward,
        })
    }
}
