//! Arena storage for B-tree nodes.
//!
//! Nodes live in one `Vec` and refer to each other by [`NodeId`]. A split
//! detaches and reattaches subtrees by moving handles around, so no node is
//! ever borrowed through another node.

use crate::common::NodeId;

use super::node::Node;

/// Owns every node of one tree.
///
/// Nodes are appended and never freed: the tree has no deletion, and a
/// split creates exactly one node.
#[derive(Debug, Clone)]
pub(crate) struct NodeArena<K> {
    nodes: Vec<Node<K>>,
}

impl<K> NodeArena<K> {
    pub(crate) fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Store `node` and return its handle.
    #[inline]
    pub(crate) fn allocate(&mut self, node: Node<K>) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(node);
        id
    }

    #[inline]
    pub(crate) fn get(&self, id: NodeId) -> Option<&Node<K>> {
        self.nodes.get(id.0)
    }

    /// Node behind a handle this arena issued.
    ///
    /// # Panics
    /// Panics if `id` was not issued by this arena.
    #[inline]
    pub(crate) fn node(&self, id: NodeId) -> &Node<K> {
        &self.nodes[id.0]
    }

    /// Mutable counterpart of [`node`](Self::node).
    ///
    /// # Panics
    /// Panics if `id` was not issued by this arena.
    #[inline]
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node<K> {
        &mut self.nodes[id.0]
    }

    /// Number of allocated nodes.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }
}
