use std::collections::HashMap;

use crate::tree::ids::NodeId;

/// Removed slots are compacted away once they outnumber live members by this
/// factor (and there are enough of them to matter).
const COMPACT_RATIO: usize = 2;
const COMPACT_MIN_SLOTS: usize = 64;

#[derive(Debug, Clone, Default)]
/// Leaves eligible for expansion, kept in insertion order so that selection
/// ties resolve the same way on every run.
///
/// Removal leaves a tombstone in the ordered slots; membership and removal
/// are O(1), compaction is amortized over removals.
pub struct Frontier {
    slots: Vec<Option<NodeId>>,
    positions: HashMap<NodeId, usize>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node; returns `false` if it was already present.
    pub fn insert(&mut self, node: NodeId) -> bool {
        if self.positions.contains_key(&node) {
            return false;
        }
        self.positions.insert(node, self.slots.len());
        self.slots.push(Some(node));
        true
    }

    /// Remove a node; returns `false` if it was not present.
    pub fn remove(&mut self, node: NodeId) -> bool {
        let Some(pos) = self.positions.remove(&node) else {
            return false;
        };
        if let Some(slot) = self.slots.get_mut(pos) {
            *slot = None;
        }
        if self.slots.len() >= COMPACT_MIN_SLOTS
            && self.slots.len() > COMPACT_RATIO * self.positions.len()
        {
            self.compact();
        }
        true
    }

    fn compact(&mut self) {
        self.slots.retain(Option::is_some);
        for (pos, node) in self.slots.iter().flatten().enumerate() {
            self.positions.insert(*node, pos);
        }
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.positions.contains_key(&node)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.positions.clear();
    }

    /// Members in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.slots.iter().flatten().copied()
    }
}
