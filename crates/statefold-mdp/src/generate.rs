use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::{ActionSpec, MdpError, MdpSpec, StateSpec};

/// Shape of a randomly generated deterministic MDP.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneratorParams {
    /// Total number of states, terminal ones included.
    pub states: usize,
    /// Actions per non-terminal state.
    pub actions: usize,
    /// How many of the states (the last ones) are terminal.
    pub terminal_states: usize,
    pub seed: u64,
}

impl GeneratorParams {
    fn validate(&self) -> Result<(), MdpError> {
        if self.actions == 0 {
            return Err(MdpError::InvalidGenerator(
                "actions must be greater than 0".to_string(),
            ));
        }
        if self.terminal_states >= self.states {
            return Err(MdpError::InvalidGenerator(
                "at least one state must be non-terminal".to_string(),
            ));
        }
        Ok(())
    }
}

fn state_id(idx: usize) -> String {
    format!("s{idx}")
}

/// Build a seeded random deterministic MDP starting at `s0`.
///
/// Action 0 of every non-terminal state cycles through the non-terminal states,
/// so a search never runs out of expandable nodes. The remaining actions jump
/// to uniformly drawn states, which makes many paths converge on the same state.
pub fn random_deterministic_spec(params: GeneratorParams) -> Result<MdpSpec, MdpError> {
    params.validate()?;

    let mut rng = ChaCha8Rng::seed_from_u64(params.seed);
    let non_terminal = params.states - params.terminal_states;

    let states = (0..params.states)
        .map(|idx| {
            if idx >= non_terminal {
                return StateSpec {
                    id: state_id(idx),
                    terminal: Some(true),
                    actions: None,
                };
            }

            let actions = (0..params.actions)
                .map(|action| {
                    let next = if action == 0 {
                        (idx + 1) % non_terminal
                    } else {
                        rng.gen_range(0..params.states)
                    };
                    ActionSpec {
                        id: format!("a{action}"),
                        next: state_id(next),
                        reward: rng.r#gen::<f64>(),
                    }
                })
                .collect();

            StateSpec {
                id: state_id(idx),
                terminal: Some(false),
                actions: Some(actions),
            }
        })
        .collect();

    let spec = MdpSpec {
        version: Some(1),
        start: state_id(0),
        states,
    };
    spec.validate()?;

    debug!(
        states = params.states,
        actions = params.actions,
        seed = params.seed,
        "generated random deterministic MDP"
    );
    Ok(spec)
}
