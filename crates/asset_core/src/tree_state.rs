//! Persisted open/closed state of directory tree nodes
//!
//! Stands in for the UI framework's node storage, keyed by [`TreeNodeId`].

use std::collections::HashMap;

use crate::metadata::TreeNodeId;

pub trait TreeStateStore: Send {
    fn set_expanded(&mut self, id: TreeNodeId, expanded: bool);

    /// `None` when the node was never toggled
    fn is_expanded(&self, id: TreeNodeId) -> Option<bool>;

    /// Drop the state of a node whose directory no longer exists
    fn forget(&mut self, id: TreeNodeId);
}

#[derive(Debug, Default, Clone)]
pub struct MemoryTreeState {
    nodes: HashMap<TreeNodeId, bool>,
}

impl MemoryTreeState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl TreeStateStore for MemoryTreeState {
    fn set_expanded(&mut self, id: TreeNodeId, expanded: bool) {
        self.nodes.insert(id, expanded);
    }

    fn is_expanded(&self, id: TreeNodeId) -> Option<bool> {
        self.nodes.get(&id).copied()
    }

    fn forget(&mut self, id: TreeNodeId) {
        self.nodes.remove(&id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use asset_fs::LogicalPath;

    #[test]
    fn test_forget_drops_node() {
        let id = TreeNodeId::for_path(&LogicalPath::new("/Assets/Textures"));
        let mut state = MemoryTreeState::new();
        state.set_expanded(id, true);
        assert_eq!(state.is_expanded(id), Some(true));

        state.forget(id);
        assert_eq!(state.is_expanded(id), None);
        assert!(state.is_empty());
    }
}
