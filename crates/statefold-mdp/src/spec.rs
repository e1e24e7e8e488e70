use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{CompiledMdp, MdpError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Serializable deterministic MDP schema used for YAML IO and validation.
pub struct MdpSpec {
    /// Schema version for future compatibility checks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
    /// String id of the start state.
    pub start: String,
    /// All state declarations in the model.
    pub states: Vec<StateSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// A single state declaration in the MDP schema.
pub struct StateSpec {
    /// Unique state id.
    pub id: String,
    /// Whether this state is terminal (defaults to `false` if omitted).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terminal: Option<bool>,
    /// Available actions from this state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actions: Option<Vec<ActionSpec>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// A named action and the single transition it causes.
pub struct ActionSpec {
    pub id: String,
    pub next: String,
    /// Normalized reward in `[0, 1]`.
    pub reward: f64,
}

impl MdpSpec {
    /// Validate ids, transitions, and reward normalization.
    pub fn validate(&self) -> Result<(), MdpError> {
        if self.start.trim().is_empty() {
            return Err(MdpError::MissingStart);
        }

        let mut ids = HashSet::with_capacity(self.states.len());
        for state in &self.states {
            if !ids.insert(state.id.as_str()) {
                return Err(MdpError::DuplicateStateId {
                    id: state.id.clone(),
                });
            }
        }

        if !ids.contains(self.start.as_str()) {
            return Err(MdpError::UnknownStartState {
                start: self.start.clone(),
            });
        }

        for state in &self.states {
            let terminal = state.terminal.unwrap_or(false);
            let actions = state.actions.as_deref().unwrap_or(&[]);

            if terminal && !actions.is_empty() {
                return Err(MdpError::TerminalStateHasActions {
                    state: state.id.clone(),
                });
            }

            let mut action_ids = HashSet::with_capacity(actions.len());
            for action in actions {
                if !action_ids.insert(action.id.as_str()) {
                    return Err(MdpError::DuplicateActionId {
                        state: state.id.clone(),
                        action: action.id.clone(),
                    });
                }

                // The planner's bounds assume rewards normalized to [0, 1].
                if !(0.0..=1.0).contains(&action.reward) {
                    return Err(MdpError::InvalidReward {
                        state: state.id.clone(),
                        action: action.id.clone(),
                        value: action.reward,
                    });
                }

                if !ids.contains(action.next.as_str()) {
                    return Err(MdpError::UnknownNextState {
                        state: state.id.clone(),
                        action: action.id.clone(),
                        next: action.next.clone(),
                    });
                }
            }
        }

        Ok(())
    }

    /// Compile this spec into the runtime representation.
    pub fn compile(&self) -> Result<CompiledMdp, MdpError> {
        CompiledMdp::from_spec(self)
    }
}
