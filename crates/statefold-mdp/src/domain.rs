use std::hash::Hash;

/// Interface for user-defined deterministic domains with arbitrary state types.
///
/// States are aggregated by `Eq`/`Hash`: two states comparing equal must be
/// interchangeable for planning purposes.
pub trait DeterministicDomain {
    type State: Clone + Eq + Hash;

    /// Return the initial state of the domain.
    fn start_state(&self) -> Self::State;

    /// Return whether a state is terminal.
    fn is_terminal(&self, state: &Self::State) -> bool;

    /// Return the number of available actions for a state.
    fn num_actions(&self, state: &Self::State) -> usize;

    /// Apply an action: `(next_state, reward in [0, 1], next_is_terminal)`.
    fn step(&self, state: &Self::State, action_id: usize) -> (Self::State, f64, bool);
}
