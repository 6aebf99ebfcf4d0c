//! Handles into a tree's node arena.

use std::fmt;

/// Position of a node in the arena of the tree that created it.
///
/// A tree hands out handles in allocation order and never reuses one: the
/// first root is `NodeId(0)` and every split or root growth takes the next
/// number. Child links are handles rather than references, which lets a
/// split move whole subtrees between nodes by copying integers.
///
/// A handle from one tree means nothing to another.
///
/// # Example
/// ```
/// use arbor::{BTree, NodeId};
///
/// let mut tree = BTree::new(2).unwrap();
/// assert_eq!(tree.root_id(), NodeId::new(0));
///
/// for key in 1..=4 {
///     tree.insert(key);
/// }
/// // The fourth key grows a new root above the first one.
/// assert_eq!(tree.root_id(), NodeId::new(1));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    #[inline]
    pub fn new(index: usize) -> Self {
        NodeId(index)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({})", self.0)
    }
}
