use crate::tree::ids::NodeId;

/// Append-only node storage. Nodes are never freed during a plan call, so a
/// `NodeId` stays valid until the arena is cleared.
#[derive(Debug, Clone)]
pub(crate) struct Arena<T> {
    storage: Vec<T>,
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Arena {
            storage: Vec::new(),
        }
    }

    /// Store an item and return the id it can be retrieved with.
    pub fn allocate(&mut self, item: T) -> NodeId {
        let id = NodeId::from(self.storage.len());
        self.storage.push(item);
        id
    }

    pub fn get(&self, node_id: NodeId) -> Option<&T> {
        self.storage.get(node_id.index())
    }

    pub fn get_mut(&mut self, node_id: NodeId) -> Option<&mut T> {
        self.storage.get_mut(node_id.index())
    }

    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Drop every item; previously issued ids become dangling.
    pub fn clear(&mut self) {
        self.storage.clear();
    }

    /// Iterate items together with their ids, in allocation order.
    pub fn iter_ids(&self) -> impl Iterator<Item = (NodeId, &T)> {
        self.storage
            .iter()
            .enumerate()
            .map(|(idx, item)| (NodeId::from(idx), item))
    }
}
