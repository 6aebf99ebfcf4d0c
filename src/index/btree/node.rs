//! B-tree node storage.
//!
//! A [`Node`] is a pure data holder: sorted keys plus child handles into the
//! owning tree's arena. It does no validation beyond bounds; the tree is
//! solely responsible for keeping the B-tree invariants.

use std::fmt;

use crate::common::NodeId;

/// A single B-tree node.
///
/// # Layout
/// ```text
///            keys:      [ k0 | k1 | ... | k(n-1) ]
///   children (internal): c0 | c1 | ... | c(n-1) | cn
/// ```
/// `keys` holds exactly `key_count` entries and `children` holds either
/// nothing (leaf) or exactly `key_count + 1` handles (internal). Both are
/// growable sequences sized to their live contents, so there are no empty
/// slots to track.
#[derive(Debug, Clone)]
pub struct Node<K> {
    keys: Vec<K>,
    children: Vec<NodeId>,
}

impl<K> Node<K> {
    /// Create an empty leaf with room for `capacity` keys.
    pub(crate) fn new_leaf(capacity: usize) -> Self {
        Self {
            keys: Vec::with_capacity(capacity),
            children: Vec::new(),
        }
    }

    /// Create an internal node with no keys and a single child.
    ///
    /// Only used while growing the root: the new root briefly has zero keys
    /// and one child until that child is split into it.
    pub(crate) fn new_root_over(child: NodeId, capacity: usize) -> Self {
        let mut children = Vec::with_capacity(capacity + 1);
        children.push(child);
        Self {
            keys: Vec::with_capacity(capacity),
            children,
        }
    }

    pub(crate) fn from_parts(keys: Vec<K>, children: Vec<NodeId>) -> Self {
        Self { keys, children }
    }

    // ========================================================================
    // Read access
    // ========================================================================

    /// Key at `index`, if live.
    #[inline]
    pub fn key(&self, index: usize) -> Option<&K> {
        self.keys.get(index)
    }

    /// All live keys, in ascending order.
    #[inline]
    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    /// Child handle at `index`, if present.
    #[inline]
    pub fn child(&self, index: usize) -> Option<NodeId> {
        self.children.get(index).copied()
    }

    /// All child handles, left to right. Empty for a leaf.
    #[inline]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Number of live keys.
    #[inline]
    pub fn key_count(&self) -> usize {
        self.keys.len()
    }

    /// True iff the node has no children.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// True iff the node holds `2t - 1` keys.
    #[inline]
    pub fn is_full(&self, min_degree: usize) -> bool {
        self.keys.len() >= 2 * min_degree - 1
    }

    // ========================================================================
    // Write access
    // ========================================================================

    /// Overwrite the key at `index`.
    ///
    /// # Panics
    /// Panics if `index >= key_count`.
    pub fn set_key(&mut self, index: usize, key: K) {
        self.keys[index] = key;
    }

    /// Overwrite the child handle at `index`.
    ///
    /// # Panics
    /// Panics if `index >= children().len()`.
    pub fn set_child(&mut self, index: usize, child: NodeId) {
        self.children[index] = child;
    }

    /// Insert `key` at `index`, shifting later keys right.
    pub(crate) fn insert_key_at(&mut self, index: usize, key: K) {
        self.keys.insert(index, key);
    }

    /// Insert `child` at `index`, shifting later children right.
    pub(crate) fn insert_child_at(&mut self, index: usize, child: NodeId) {
        self.children.insert(index, child);
    }

    /// Split a full node around its median.
    ///
    /// Given `2t - 1` keys, this node keeps its upper `t - 1` keys (and, if
    /// internal, its upper `t` children), moved to the front of its storage.
    /// Returns the median key together with the lower `t - 1` keys and lower
    /// `t` children, in that order.
    pub(crate) fn split_off_lower(&mut self, min_degree: usize) -> (K, Vec<K>, Vec<NodeId>) {
        debug_assert_eq!(self.keys.len(), 2 * min_degree - 1);

        let mut upper_keys = self.keys.split_off(min_degree - 1);
        let median = upper_keys.remove(0);
        let lower_keys = std::mem::replace(&mut self.keys, upper_keys);

        let lower_children = if self.children.is_empty() {
            Vec::new()
        } else {
            let upper_children = self.children.split_off(min_degree);
            std::mem::replace(&mut self.children, upper_children)
        };

        (median, lower_keys, lower_children)
    }

    /// Position of the first key greater than `key`.
    ///
    /// Equal keys sort before the search key, so duplicates land to the right of
    /// every existing equal key, and descent goes right of equal separators.
    #[inline]
    pub(crate) fn upper_bound(&self, key: &K) -> usize
    where
        K: Ord,
    {
        self.keys.partition_point(|k| k <= key)
    }

    /// Position of the first key not less than `key`.
    #[inline]
    pub(crate) fn lower_bound(&self, key: &K) -> usize
    where
        K: Ord,
    {
        self.keys.partition_point(|k| k < key)
    }
}

impl<K: fmt::Display> fmt::Display for Node<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, key) in self.keys.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", key)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[usize]) -> Vec<NodeId> {
        raw.iter().copied().map(NodeId::new).collect()
    }

    #[test]
    fn test_new_leaf_is_empty() {
        let node: Node<i32> = Node::new_leaf(3);
        assert_eq!(node.key_count(), 0);
        assert!(node.is_leaf());
        assert!(node.keys().is_empty());
        assert_eq!(node.key(0), None);
        assert_eq!(node.child(0), None);
    }

    #[test]
    fn test_new_root_over_has_one_child() {
        let node: Node<i32> = Node::new_root_over(NodeId::new(7), 3);
        assert_eq!(node.key_count(), 0);
        assert!(!node.is_leaf());
        assert_eq!(node.children(), &[NodeId::new(7)]);
    }

    #[test]
    fn test_insert_and_set() {
        let mut node = Node::new_leaf(3);
        node.insert_key_at(0, 20);
        node.insert_key_at(0, 10);
        node.insert_key_at(2, 30);
        assert_eq!(node.keys(), &[10, 20, 30]);

        node.set_key(1, 25);
        assert_eq!(node.key(1), Some(&25));
        assert!(node.is_full(2));
        assert!(!node.is_full(3));
    }

    #[test]
    fn test_bounds_with_duplicates() {
        let node = Node::from_parts(vec![5, 10, 10, 20], Vec::new());
        assert_eq!(node.lower_bound(&10), 1);
        assert_eq!(node.upper_bound(&10), 3);
        assert_eq!(node.lower_bound(&1), 0);
        assert_eq!(node.upper_bound(&99), 4);
    }

    #[test]
    fn test_split_leaf() {
        let mut node = Node::from_parts(vec![1, 2, 3, 4, 5], Vec::new());
        let (median, lower_keys, lower_children) = node.split_off_lower(3);

        assert_eq!(median, 3);
        assert_eq!(lower_keys, vec![1, 2]);
        assert!(lower_children.is_empty());
        assert_eq!(node.keys(), &[4, 5]);
        assert!(node.is_leaf());
    }

    #[test]
    fn test_split_internal() {
        let mut node = Node::from_parts(vec![10, 20, 30], ids(&[0, 1, 2, 3]));
        let (median, lower_keys, lower_children) = node.split_off_lower(2);

        assert_eq!(median, 20);
        assert_eq!(lower_keys, vec![10]);
        assert_eq!(lower_children, ids(&[0, 1]));
        assert_eq!(node.keys(), &[30]);
        assert_eq!(node.children(), ids(&[2, 3]).as_slice());

        node.set_child(0, NodeId::new(9));
        assert_eq!(node.child(0), Some(NodeId::new(9)));
    }

    #[test]
    fn test_display() {
        let node = Node::from_parts(vec![1, 2, 3], Vec::new());
        assert_eq!(format!("{}", node), "[1 2 3]");

        let empty: Node<i32> = Node::new_leaf(3);
        assert_eq!(format!("{}", empty), "[]");
    }
}
