use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_PLANNER_CONFIG_YAML: &str = include_str!("../../config/planner.default.yaml");

/// Configuration of the aggregating planner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Simulated transitions available per plan call.
    pub budget: usize,
    /// Discount factor in `[0, 1)`.
    pub gamma: f64,
    /// Propagate tightened bounds to every path reaching the same state.
    pub backup_aggregated_nodes: bool,
    /// Keep a single frontier node per state.
    pub prune_suboptimal_leaves: bool,
    /// Minimum bound improvement that keeps a backup propagating.
    pub stopping_accuracy: f64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        PlannerConfig {
            budget: 500,
            gamma: 0.8,
            backup_aggregated_nodes: true,
            prune_suboptimal_leaves: true,
            stopping_accuracy: 0.0,
        }
    }
}

impl PlannerConfig {
    /// Parse a planner config from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, PlannerConfigError> {
        let config: PlannerConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a planner config from a YAML file path.
    pub fn from_yaml_path(path: impl AsRef<Path>) -> Result<Self, PlannerConfigError> {
        let yaml = fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    /// Return the default YAML config included with this crate.
    pub fn default_yaml() -> &'static str {
        DEFAULT_PLANNER_CONFIG_YAML
    }

    pub fn from_default_yaml() -> Result<Self, PlannerConfigError> {
        Self::from_yaml_str(Self::default_yaml())
    }

    /// Check the numeric constraints the bounds rely on.
    pub fn validate(&self) -> Result<(), PlannerConfigError> {
        if self.budget == 0 {
            return Err(PlannerConfigError::Invalid(
                "budget must be greater than 0".to_string(),
            ));
        }
        if !self.gamma.is_finite() || !(0.0..1.0).contains(&self.gamma) {
            return Err(PlannerConfigError::Invalid(
                "gamma must be finite and in [0, 1)".to_string(),
            ));
        }
        if !self.stopping_accuracy.is_finite() || self.stopping_accuracy < 0.0 {
            return Err(PlannerConfigError::Invalid(
                "stopping_accuracy must be finite and >= 0".to_string(),
            ));
        }
        Ok(())
    }

    /// `1 / (1 - gamma)`, the value of an endless stream of unit rewards.
    pub fn max_value(&self) -> f64 {
        1.0 / (1.0 - self.gamma)
    }
}

/// Error type for loading and validating `PlannerConfig`.
#[derive(Debug, Error)]
pub enum PlannerConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid planner config: {0}")]
    Invalid(String),
}
