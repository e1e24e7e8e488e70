use crate::tree::{
    config::PlannerConfig,
    ids::{ActionId, NodeId, StateKey},
    planner::AggregatingPlanner,
};

const A: u64 = 0;
const B: u64 = 1;
const C: u64 = 2;

fn config(gamma: f64) -> PlannerConfig {
    PlannerConfig {
        budget: 64,
        gamma,
        backup_aggregated_nodes: true,
        prune_suboptimal_leaves: true,
        stopping_accuracy: 0.0,
    }
}

/// A has two actions that both reach B; B leads to the terminal state C.
fn converging_actions(state: StateKey) -> usize {
    match state.value() {
        A => 2,
        B => 1,
        _ => 0,
    }
}

fn converging_step(state: StateKey, action: ActionId) -> (StateKey, f64, bool) {
    match (state.value(), action.index()) {
        (A, 0) => (StateKey::from(B), 1.0, false),
        (A, _) => (StateKey::from(B), 0.5, false),
        _ => (StateKey::from(C), 0.0, true),
    }
}

#[test]
fn aggregated_children_keep_only_the_best_leaf() {
    let mut planner = AggregatingPlanner::new(config(0.9)).expect("valid config");
    planner.reset(StateKey::from(A));
    let root = planner.tree().root_id();

    let expansion = planner
        .expand(root, &mut converging_actions, &mut converging_step)
        .expect("root expansion should succeed");

    assert_eq!(expansion.children_created, 2);
    assert_eq!(expansion.pruned_leaves, 1);

    let high = NodeId::from(1);
    let low = NodeId::from(2);
    assert_eq!(planner.registry().nodes_at(StateKey::from(B)), &[high, low]);
    assert!(planner.frontier().contains(high));
    assert!(!planner.frontier().contains(low));
    assert!(!planner.frontier().contains(root));

    let high_bound = planner.value_upper_bound(high).expect("node exists");
    let low_bound = planner.value_upper_bound(low).expect("node exists");
    assert!((high_bound - 10.0).abs() < 1e-9);
    assert!((low_bound - 9.5).abs() < 1e-9);
}

#[test]
fn terminal_descendant_tightens_shared_state_and_root() {
    let mut planner = AggregatingPlanner::new(config(0.9)).expect("valid config");
    planner.reset(StateKey::from(A));
    let root = planner.tree().root_id();

    planner
        .expand(root, &mut converging_actions, &mut converging_step)
        .expect("root expansion should succeed");
    let first_backup = planner.backup_to_root(root).expect("backup should succeed");
    assert_eq!(first_backup, 1);
    assert_eq!(planner.registry().upper_bound(StateKey::from(A)), 10.0);

    let high = NodeId::from(1);
    planner
        .expand(high, &mut converging_actions, &mut converging_step)
        .expect("expansion of B should succeed");
    assert_eq!(planner.registry().upper_bound(StateKey::from(C)), 0.0);

    // high, root via its own parent chain, root again via the aggregated sibling.
    let updated = planner.backup_to_root(high).expect("backup should succeed");
    assert_eq!(updated, 3);

    assert_eq!(planner.registry().upper_bound(StateKey::from(B)), 0.0);
    assert!((planner.registry().upper_bound(StateKey::from(A)) - 1.0).abs() < 1e-9);
    assert!((planner.value_upper_bound(root).expect("root exists") - 1.0).abs() < 1e-9);

    let plan = planner.extract_plan().expect("plan extraction should succeed");
    assert_eq!(plan, vec![ActionId::from(0), ActionId::from(0)]);
}

#[test]
fn stopping_accuracy_blocks_propagation_after_successful_tighten() {
    let mut planner = AggregatingPlanner::new(PlannerConfig {
        stopping_accuracy: 11.0,
        ..config(0.9)
    })
    .expect("valid config");
    planner.reset(StateKey::from(A));
    let root = planner.tree().root_id();

    planner
        .expand(root, &mut converging_actions, &mut converging_step)
        .expect("root expansion should succeed");
    let high = NodeId::from(1);
    planner
        .expand(high, &mut converging_actions, &mut converging_step)
        .expect("expansion of B should succeed");

    let updated = planner.backup_to_root(high).expect("backup should succeed");

    assert_eq!(updated, 1);
    assert_eq!(planner.registry().upper_bound(StateKey::from(B)), 0.0);
    assert_eq!(planner.registry().upper_bound(StateKey::from(A)), 10.0);
}

#[test]
fn disabled_aggregation_backs_up_own_ancestors_only() {
    let mut planner = AggregatingPlanner::new(PlannerConfig {
        backup_aggregated_nodes: false,
        ..config(0.9)
    })
    .expect("valid config");
    planner.reset(StateKey::from(A));
    let root = planner.tree().root_id();

    planner
        .expand(root, &mut converging_actions, &mut converging_step)
        .expect("root expansion should succeed");
    let high = NodeId::from(1);
    planner
        .expand(high, &mut converging_actions, &mut converging_step)
        .expect("expansion of B should succeed");

    let updated = planner.backup_to_root(high).expect("backup should succeed");

    assert_eq!(updated, 2);
    assert!((planner.registry().upper_bound(StateKey::from(A)) - 1.0).abs() < 1e-9);
}

#[test]
fn disabled_pruning_keeps_every_leaf() {
    let mut planner = AggregatingPlanner::new(PlannerConfig {
        prune_suboptimal_leaves: false,
        ..config(0.9)
    })
    .expect("valid config");
    planner.reset(StateKey::from(A));
    let root = planner.tree().root_id();

    let expansion = planner
        .expand(root, &mut converging_actions, &mut converging_step)
        .expect("root expansion should succeed");

    assert_eq!(expansion.pruned_leaves, 0);
    assert_eq!(planner.frontier().len(), 2);
}

#[test]
fn backup_of_leaf_is_a_no_op() {
    let mut planner = AggregatingPlanner::new(config(0.9)).expect("valid config");
    planner.reset(StateKey::from(A));
    let root = planner.tree().root_id();

    let updated = planner.backup_to_root(root).expect("backup should succeed");

    assert_eq!(updated, 0);
    assert_eq!(planner.registry().upper_bound(StateKey::from(A)), 10.0);
}

#[test]
fn value_upper_bound_discounts_from_the_root() {
    let mut planner = AggregatingPlanner::new(config(0.9)).expect("valid config");
    let mut num_actions = |state: StateKey| if state.value() < 2 { 1 } else { 0 };
    let mut step = |state: StateKey, _action: ActionId| match state.value() {
        0 => (StateKey::from(1), 0.5, false),
        _ => (StateKey::from(2), 0.25, false),
    };

    planner.reset(StateKey::from(0));
    let root = planner.tree().root_id();
    planner
        .expand(root, &mut num_actions, &mut step)
        .expect("root expansion should succeed");
    planner
        .expand(NodeId::from(1), &mut num_actions, &mut step)
        .expect("second expansion should succeed");

    let leaf = planner.tree().node(NodeId::from(2)).expect("leaf exists");
    assert_eq!(leaf.depth(), 2);
    assert!((leaf.accumulated_value() - 0.725).abs() < 1e-12);

    let expected = 0.725 + 0.81 * planner.registry().upper_bound(StateKey::from(2));
    let actual = planner.value_upper_bound(NodeId::from(2)).expect("leaf exists");
    assert!((actual - expected).abs() < 1e-12);
    assert!((actual - 8.825).abs() < 1e-9);
}

#[test]
fn plan_spends_budget_per_simulated_transition() {
    let mut planner = AggregatingPlanner::new(PlannerConfig {
        budget: 3,
        ..config(0.9)
    })
    .expect("valid config");

    let mut seen = Vec::new();
    let plan = planner
        .plan_with_hook(
            StateKey::from(A),
            converging_actions,
            converging_step,
            |iteration| seen.push((iteration.state_key, iteration.budget_spent)),
        )
        .expect("plan should succeed");

    assert_eq!(
        seen,
        vec![(StateKey::from(A), 2), (StateKey::from(B), 3)]
    );
    assert_eq!(plan.metrics.expansions, 2);
    assert_eq!(plan.metrics.budget_spent, 3);
    assert_eq!(plan.metrics.states_explored, 3);
    assert_eq!(plan.metrics.pruned_leaves, 1);
    assert_eq!(plan.metrics.updated_nodes, 4);
    assert_eq!(plan.first_action(), Some(ActionId::from(0)));
}

#[test]
fn budget_smaller_than_action_count_expands_nothing() {
    let mut planner = AggregatingPlanner::new(PlannerConfig {
        budget: 1,
        ..config(0.9)
    })
    .expect("valid config");

    let plan = planner
        .plan(StateKey::from(A), converging_actions, converging_step)
        .expect("plan should succeed");

    assert_eq!(plan.metrics.expansions, 0);
    assert!(plan.actions.is_empty());
    assert_eq!(planner.tree().node_count(), 1);
}

#[test]
fn plan_resets_state_between_calls() {
    let mut planner = AggregatingPlanner::new(PlannerConfig {
        budget: 3,
        ..config(0.9)
    })
    .expect("valid config");

    let first = planner
        .plan(StateKey::from(A), converging_actions, converging_step)
        .expect("first plan should succeed");
    let second = planner
        .plan(StateKey::from(A), converging_actions, converging_step)
        .expect("second plan should succeed");

    assert_eq!(first.metrics, second.metrics);
    assert_eq!(first.actions, second.actions);
    assert_eq!(planner.tree().node_count(), 4);
}

#[test]
fn snapshot_reports_frontier_and_tightened_bounds() {
    let mut planner = AggregatingPlanner::new(PlannerConfig {
        budget: 3,
        ..config(0.9)
    })
    .expect("valid config");
    planner
        .plan(StateKey::from(A), converging_actions, converging_step)
        .expect("plan should succeed");

    let snapshot = planner.snapshot();

    assert_eq!(snapshot.node_count, 4);
    assert_eq!(snapshot.state_count, 3);
    assert_eq!(snapshot.frontier_len, 1);
    assert!(snapshot.nodes[3].in_frontier);
    assert!(!snapshot.nodes[2].in_frontier);
    assert_eq!(snapshot.nodes[3].parent_node_id, Some(NodeId::from(1)));
    assert_eq!(
        snapshot
            .bounds
            .iter()
            .map(|bound| bound.state_key.value())
            .collect::<Vec<_>>(),
        vec![A, B, C]
    );

    let json = snapshot.to_json().expect("snapshot serializes");
    assert!(json.contains("\"schema_version\":1"));
}

/// Three actions from state 0 that all reach state 1 with the same reward.
fn tied_actions(state: StateKey) -> usize {
    if state.value() == 0 { 3 } else { 0 }
}

fn tied_step(_state: StateKey, _action: ActionId) -> (StateKey, f64, bool) {
    (StateKey::from(1), 0.5, false)
}

#[test]
fn pruning_tie_keeps_first_registered_leaf() {
    let mut planner = AggregatingPlanner::new(config(0.9)).expect("valid config");
    planner.reset(StateKey::from(0));
    let root = planner.tree().root_id();

    let expansion = planner
        .expand(root, &mut tied_actions, &mut tied_step)
        .expect("root expansion should succeed");

    assert_eq!(expansion.pruned_leaves, 2);
    assert_eq!(
        planner.registry().nodes_at(StateKey::from(1)),
        &[NodeId::from(1), NodeId::from(2), NodeId::from(3)]
    );
    assert_eq!(
        planner.frontier().iter().collect::<Vec<_>>(),
        vec![NodeId::from(1)]
    );
}

#[test]
fn selection_tie_picks_earliest_frontier_node() {
    let mut planner = AggregatingPlanner::new(PlannerConfig {
        prune_suboptimal_leaves: false,
        ..config(0.9)
    })
    .expect("valid config");
    planner.reset(StateKey::from(0));
    let root = planner.tree().root_id();

    planner
        .expand(root, &mut tied_actions, &mut tied_step)
        .expect("root expansion should succeed");

    assert_eq!(planner.frontier().len(), 3);
    let first = planner.value_upper_bound(NodeId::from(1)).expect("node exists");
    let last = planner.value_upper_bound(NodeId::from(3)).expect("node exists");
    assert_eq!(first, last);
    assert_eq!(planner.select_leaf(), Ok(NodeId::from(1)));
}

#[test]
fn plan_extraction_tie_picks_lowest_action() {
    let mut planner = AggregatingPlanner::new(PlannerConfig {
        budget: 2,
        ..config(0.9)
    })
    .expect("valid config");

    // Two distinct successor states, identical rewards and bounds.
    let num_actions = |state: StateKey| if state.value() == 0 { 2 } else { 0 };
    let step = |_state: StateKey, action: ActionId| {
        (StateKey::from(1 + action.index() as u64), 0.5, false)
    };

    let plan = planner
        .plan(StateKey::from(0), num_actions, step)
        .expect("plan should succeed");

    assert_eq!(plan.metrics.expansions, 1);
    assert_eq!(
        planner.value_upper_bound(NodeId::from(1)),
        planner.value_upper_bound(NodeId::from(2))
    );
    assert_eq!(plan.actions, vec![ActionId::from(0)]);
}
