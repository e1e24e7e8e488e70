mod arena;
pub mod config;
pub mod error;
pub mod frontier;
pub mod ids;
pub mod node;
pub mod planner;
pub mod registry;
pub mod search_tree;
pub mod snapshot;

#[cfg(test)]
mod tests;
