use std::path::PathBuf;

use statefold_core::{AggregatingPlanner, PlannerConfig};
use statefold_mdp::{compile_yaml, plan_compiled};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let path = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("crates/statefold-mdp/examples/sample.mdp.yaml"));
    let config = match args.next() {
        Some(config_path) => {
            PlannerConfig::from_yaml_path(config_path).expect("failed to load planner config")
        }
        None => PlannerConfig::from_default_yaml().expect("default config should parse"),
    };

    let compiled = compile_yaml(&path).expect("failed to compile MDP YAML");
    let mut planner = AggregatingPlanner::new(config).expect("invalid planner config");

    let plan = plan_compiled(&mut planner, &compiled, compiled.start()).expect("planning failed");

    let actions: Vec<usize> = plan.actions.iter().map(|action| action.index()).collect();
    println!("plan={actions:?}");
    println!(
        "expansions={} states_explored={} updated_nodes={} pruned_leaves={}",
        plan.metrics.expansions,
        plan.metrics.states_explored,
        plan.metrics.updated_nodes,
        plan.metrics.pruned_leaves
    );
    println!(
        "root_upper_bound={:.6}",
        planner.registry().upper_bound(compiled.start().into())
    );
}
