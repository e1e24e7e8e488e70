use std::collections::HashMap;

use statefold_core::StateKey;

use crate::{MdpError, MdpSpec};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Dense index for states in a compiled MDP.
pub struct StateIndex(usize);

impl StateIndex {
    /// Return the underlying state index.
    pub fn index(self) -> usize {
        self.0
    }

    /// Recover the index from a planner key produced by `StateKey::from(index)`.
    pub fn from_key(key: StateKey) -> Self {
        Self(key.value() as usize)
    }
}

impl From<usize> for StateIndex {
    fn from(value: usize) -> Self {
        Self(value)
    }
}

impl From<StateIndex> for StateKey {
    fn from(value: StateIndex) -> Self {
        StateKey::from(value.0 as u64)
    }
}

#[derive(Debug, Clone)]
/// Runtime form of a deterministic MDP with resolved state references.
pub struct CompiledMdp {
    start: StateIndex,
    states: Vec<StateRec>,
    state_ids: Vec<String>,
    state_id_to_index: HashMap<String, StateIndex>,
}

#[derive(Debug, Clone)]
struct StateRec {
    terminal: bool,
    actions: Vec<ActionRec>,
}

#[derive(Debug, Clone, Copy)]
struct ActionRec {
    next: StateIndex,
    reward: f64,
}

impl CompiledMdp {
    /// Compile and validate a spec into a fast runtime representation.
    pub(crate) fn from_spec(spec: &MdpSpec) -> Result<Self, MdpError> {
        spec.validate()?;

        let mut state_id_to_index = HashMap::with_capacity(spec.states.len());
        let mut state_ids = Vec::with_capacity(spec.states.len());

        for (idx, state) in spec.states.iter().enumerate() {
            state_id_to_index.insert(state.id.clone(), StateIndex::from(idx));
            state_ids.push(state.id.clone());
        }

        let start = state_id_to_index.get(&spec.start).copied().ok_or_else(|| {
            MdpError::UnknownStartState {
                start: spec.start.clone(),
            }
        })?;

        let mut states = Vec::with_capacity(spec.states.len());
        for state in &spec.states {
            let mut actions = Vec::new();
            for action in state.actions.as_deref().unwrap_or(&[]) {
                let next = state_id_to_index.get(&action.next).copied().ok_or_else(|| {
                    MdpError::UnknownNextState {
                        state: state.id.clone(),
                        action: action.id.clone(),
                        next: action.next.clone(),
                    }
                })?;
                actions.push(ActionRec {
                    next,
                    reward: action.reward,
                });
            }

            states.push(StateRec {
                terminal: state.terminal.unwrap_or(false),
                actions,
            });
        }

        Ok(Self {
            start,
            states,
            state_ids,
            state_id_to_index,
        })
    }

    /// Return the start state index.
    pub fn start(&self) -> StateIndex {
        self.start
    }

    /// Return the number of compiled states.
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Check whether a state is terminal.
    pub fn is_terminal(&self, state: StateIndex) -> Option<bool> {
        self.states.get(state.index()).map(|rec| rec.terminal)
    }

    /// Return the number of actions available from a state.
    pub fn num_actions(&self, state: StateIndex) -> Option<usize> {
        self.states.get(state.index()).map(|rec| rec.actions.len())
    }

    /// Convert a state index back to its original string id.
    pub fn state_id(&self, state: StateIndex) -> Option<&str> {
        self.state_ids.get(state.index()).map(String::as_str)
    }

    /// Convert a string id into a compiled state index.
    pub fn state_index(&self, id: &str) -> Option<StateIndex> {
        self.state_id_to_index.get(id).copied()
    }

    /// Apply `action` in `state` and return `(next, reward, next_is_terminal)`.
    /// Terminal states and invalid inputs yield a zero-reward terminal self-loop.
    pub fn transition(&self, state: StateIndex, action: usize) -> (StateIndex, f64, bool) {
        let Some(rec) = self.states.get(state.index()) else {
            return (state, 0.0, true);
        };
        if rec.terminal {
            return (state, 0.0, true);
        }
        let Some(action) = rec.actions.get(action) else {
            return (state, 0.0, true);
        };

        let next_terminal = self
            .states
            .get(action.next.index())
            .is_none_or(|next| next.terminal);
        (action.next, action.reward, next_terminal)
    }

    /// Optimal discounted values of every state by value iteration.
    ///
    /// Terminal states and states without actions are worth 0.
    pub fn optimal_values(&self, gamma: f64, sweeps: usize) -> Vec<f64> {
        let mut values = vec![0.0; self.states.len()];
        for _ in 0..sweeps {
            let mut next_values = vec![0.0; self.states.len()];
            for (idx, rec) in self.states.iter().enumerate() {
                if rec.terminal {
                    continue;
                }
                next_values[idx] = rec
                    .actions
                    .iter()
                    .map(|action| action.reward + gamma * values[action.next.index()])
                    .fold(0.0, f64::max);
            }
            values = next_values;
        }
        values
    }
}
