use thiserror::Error;

#[derive(Debug, Error)]
/// Error type for MDP loading, validation, compilation, generation and planning.
pub enum MdpError {
    #[error("failed to read YAML file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("missing start state")]
    MissingStart,

    #[error("start state '{start}' does not exist")]
    UnknownStartState { start: String },

    #[error("duplicate state id '{id}'")]
    DuplicateStateId { id: String },

    #[error("duplicate action id '{action}' in state '{state}'")]
    DuplicateActionId { state: String, action: String },

    #[error("state '{state}' is terminal and cannot declare actions")]
    TerminalStateHasActions { state: String },

    #[error("action '{action}' in state '{state}' references unknown next state '{next}'")]
    UnknownNextState {
        state: String,
        action: String,
        next: String,
    },

    #[error("reward of action '{action}' in state '{state}' must be in [0, 1], got {value}")]
    InvalidReward {
        state: String,
        action: String,
        value: f64,
    },

    #[error("builder referenced unknown state '{state}'")]
    BuilderUnknownState { state: String },

    #[error("invalid generator parameters: {0}")]
    InvalidGenerator(String),

    #[error("planner config rejected: {0}")]
    Config(#[from] statefold_core::PlannerConfigError),

    #[error("planning failed: {0}")]
    Planning(#[from] statefold_core::TreeError),
}
