use std::collections::HashMap;
use std::hash::Hash;

use statefold_core::StateKey;

/// Canonical key function for arbitrary states.
///
/// Keys are dense and assigned in first-seen order, so equal states always map
/// to the same `StateKey` and distinct states never collide.
#[derive(Debug, Clone)]
pub struct StateInterner<S>
where
    S: Clone + Eq + Hash,
{
    states: Vec<S>,
    keys: HashMap<S, StateKey>,
}

impl<S> Default for StateInterner<S>
where
    S: Clone + Eq + Hash,
{
    fn default() -> Self {
        Self {
            states: Vec::new(),
            keys: HashMap::new(),
        }
    }
}

impl<S> StateInterner<S>
where
    S: Clone + Eq + Hash,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the key of `state`, assigning a new one on first sight.
    pub fn intern(&mut self, state: &S) -> StateKey {
        if let Some(key) = self.keys.get(state) {
            return *key;
        }

        let key = StateKey::from(self.states.len() as u64);
        self.states.push(state.clone());
        self.keys.insert(state.clone(), key);
        key
    }

    /// State a key was assigned to.
    pub fn resolve(&self, key: StateKey) -> Option<&S> {
        self.states.get(key.value() as usize)
    }

    pub fn key_of(&self, state: &S) -> Option<StateKey> {
        self.keys.get(state).copied()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Forget every state; keys issued before become meaningless.
    pub fn clear(&mut self) {
        self.states.clear();
        self.keys.clear();
    }
}
