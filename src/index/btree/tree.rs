//! The B-tree engine.
//!
//! [`BTree`] owns the node arena and the root handle, and implements lookup,
//! insertion and the split/promote protocol. Insertion is a single top-down
//! pass that splits any full child *before* descending into it, so the node
//! receiving a promoted median is never full and nothing propagates upward.

use std::fmt;

use tracing::{debug, trace};

use crate::common::{BTreeConfig, Error, NodeId, Result};

use super::arena::NodeArena;
use super::hooks::{NodeHooks, NoopHooks};
use super::node::Node;
use super::stats::TreeStats;

/// An in-memory B-tree over totally ordered keys.
///
/// # Architecture
/// ```text
/// ┌───────────────────────────────────────────────────────────┐
/// │                        BTree<K>                           │
/// │  ┌──────────┐   ┌─────────────────────────────────────┐   │
/// │  │   root   │──▶│     arena: Vec<Node<K>>             │   │
/// │  │  NodeId  │   │  [Node0] [Node1] [Node2] ...        │   │
/// │  └──────────┘   └─────────────────────────────────────┘   │
/// │  ┌──────────┐   ┌──────────┐   ┌──────────┐               │
/// │  │  config  │   │  hooks   │   │  stats   │               │
/// │  │ t fixed  │   │ dyn trait│   │ atomics  │               │
/// │  └──────────┘   └──────────┘   └──────────┘               │
/// └───────────────────────────────────────────────────────────┘
/// ```
///
/// # Invariants
/// Before and after every public call:
/// 1. Every non-root node has `t-1 ..= 2t-1` keys; the root has `0 ..= 2t-1`.
/// 2. Keys inside a node are in ascending order.
/// 3. All leaves are at the same depth.
/// 4. An internal node has exactly `key_count + 1` children.
///
/// # Duplicates
/// Equal keys are accepted and stored as separate entries. A duplicate goes
/// after every existing equal key; [`search`](Self::search) returns the first
/// equal key met on the way down.
///
/// # Concurrency
/// Not synchronized. The tree is `Send + Sync` when `K` is, so it can sit
/// behind an `RwLock`: callers must serialize `insert` and only run
/// `search` while no insert is in flight.
///
/// # Example
/// ```
/// use arbor::BTree;
///
/// let mut tree = BTree::new(2).unwrap();
/// for key in [10, 20, 5, 6, 12, 30, 7, 17] {
///     tree.insert(key);
/// }
///
/// let hit = tree.search(&12).unwrap();
/// assert_eq!(hit.key(), &12);
/// assert!(tree.search(&13).is_none());
/// assert_eq!(tree.height(), 1);
/// ```
pub struct BTree<K> {
    /// Shape parameters (immutable after construction).
    config: BTreeConfig,

    /// Storage for every node, addressed by `NodeId`.
    arena: NodeArena<K>,

    /// Current root. Changes only when the root splits.
    root: NodeId,

    /// Number of keys stored, duplicates included.
    len: usize,

    /// Storage-layer callbacks.
    hooks: Box<dyn NodeHooks<K>>,

    /// Operation counters.
    stats: TreeStats,
}

/// Location of a key found by [`BTree::search`].
///
/// Exposes the node and the in-node offset rather than a bare boolean so
/// callers can read the stored key (or its neighbours) directly.
#[derive(Debug)]
pub struct SearchResult<'a, K> {
    node_id: NodeId,
    node: &'a Node<K>,
    index: usize,
}

impl<'a, K> SearchResult<'a, K> {
    /// Handle of the node holding the key.
    #[inline]
    pub fn node_id(&self) -> NodeId {
        self.node_id
    }

    /// The node holding the key.
    #[inline]
    pub fn node(&self) -> &'a Node<K> {
        self.node
    }

    /// Offset of the key inside [`node`](Self::node).
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// The stored key.
    #[inline]
    pub fn key(&self) -> &'a K {
        &self.node.keys()[self.index]
    }
}

// Two results are the same iff they point at the same slot.
impl<K> PartialEq for SearchResult<'_, K> {
    fn eq(&self, other: &Self) -> bool {
        self.node_id == other.node_id && self.index == other.index
    }
}

impl<K> Eq for SearchResult<'_, K> {}

impl<K: Ord> BTree<K> {
    /// Create an empty tree with minimum degree `min_degree`.
    ///
    /// # Errors
    /// - `Error::InvalidArgument` if `min_degree < 2`
    pub fn new(min_degree: usize) -> Result<Self> {
        Self::with_config(BTreeConfig::new(min_degree))
    }

    /// Create an empty tree from a config, with no storage hooks.
    ///
    /// # Errors
    /// - `Error::InvalidArgument` if the config is invalid
    pub fn with_config(config: BTreeConfig) -> Result<Self> {
        Self::with_hooks(config, NoopHooks)
    }

    /// Create an empty tree that reports node access to `hooks`.
    ///
    /// # Errors
    /// - `Error::InvalidArgument` if the config is invalid
    pub fn with_hooks(config: BTreeConfig, hooks: impl NodeHooks<K> + 'static) -> Result<Self> {
        config.validate()?;

        let mut arena = NodeArena::new();
        let root = arena.allocate(Node::new_leaf(config.max_keys()));
        debug!(min_degree = config.min_degree, "created B-tree");

        Ok(Self {
            config,
            arena,
            root,
            len: 0,
            hooks: Box::new(hooks),
            stats: TreeStats::new(),
        })
    }

    // ========================================================================
    // Public API: Lookup
    // ========================================================================

    /// Find `key`.
    ///
    /// Returns the node and offset of the first equal key met top-down, or
    /// `None` if the key is absent. Absence is a normal outcome, not an error.
    pub fn search(&self, key: &K) -> Option<SearchResult<'_, K>> {
        TreeStats::bump(&self.stats.searches);
        trace!(root = %self.root, "search");

        let mut current = self.root;
        loop {
            let node = self.read_node(current);
            let index = node.lower_bound(key);

            if index < node.key_count() && node.keys()[index] == *key {
                trace!(node = %current, index, "search hit");
                return Some(SearchResult {
                    node_id: current,
                    node,
                    index,
                });
            }
            if node.is_leaf() {
                trace!(leaf = %current, "search miss");
                return None;
            }
            current = node.children()[index];
        }
    }

    /// True iff `key` is stored at least once.
    pub fn contains(&self, key: &K) -> bool {
        self.search(key).is_some()
    }

    // ========================================================================
    // Public API: Insertion
    // ========================================================================

    /// Insert `key`.
    ///
    /// Never fails; capacity is bounded only by memory. Equal keys are kept
    /// as separate entries.
    pub fn insert(&mut self, key: K) {
        let t = self.config.min_degree;
        trace!(root = %self.root, len = self.len, "insert");

        if self.arena.node(self.root).is_full(t) {
            self.grow_root();
        }

        let mut current = self.root;
        self.read_node(current);
        loop {
            let node = self.arena.node(current);
            let mut index = node.upper_bound(&key);

            if node.is_leaf() {
                self.arena.node_mut(current).insert_key_at(index, key);
                self.write_node(current);
                trace!(leaf = %current, index, "inserted key");
                break;
            }

            let mut child = node.children()[index];
            self.read_node(child);
            if self.arena.node(child).is_full(t) {
                self.split_child(current, index);
                // The promoted median now sits at `index`; go right of it
                // unless the new key sorts strictly before it.
                let parent = self.arena.node(current);
                if parent.keys()[index] <= key {
                    index += 1;
                }
                child = parent.children()[index];
            }
            current = child;
        }

        self.len += 1;
        TreeStats::bump(&self.stats.inserts);
    }

    // ========================================================================
    // Split / promote
    // ========================================================================

    /// Add a level: put a fresh, empty root above the full old root and
    /// split the old root into it.
    fn grow_root(&mut self) {
        let old_root = self.root;
        let new_root = self
            .arena
            .allocate(Node::new_root_over(old_root, self.config.max_keys()));
        self.root = new_root;

        self.split_child(new_root, 0);
        TreeStats::bump(&self.stats.root_splits);
        debug!(
            old_root = %old_root,
            new_root = %new_root,
            height = self.height(),
            "root split"
        );
    }

    /// Split the full child at `parent.children[child_index]`.
    ///
    /// A new sibling takes the child's lower `t-1` keys (and lower `t`
    /// children), the child keeps its upper `t-1` keys (and upper `t`
    /// children), and the median moves into `parent` at `child_index`.
    /// Afterwards the sibling sits at `child_index` and the shrunk child at
    /// `child_index + 1`. Touches only parent, child and the new sibling.
    ///
    /// The parent must not be full and the child must be full.
    fn split_child(&mut self, parent: NodeId, child_index: usize) {
        let t = self.config.min_degree;
        let child = self.arena.node(parent).children()[child_index];
        debug_assert!(!self.arena.node(parent).is_full(t), "parent is full");
        debug_assert!(self.arena.node(child).is_full(t), "child is not full");

        let (median, lower_keys, lower_children) = self.arena.node_mut(child).split_off_lower(t);
        let sibling = self
            .arena
            .allocate(Node::from_parts(lower_keys, lower_children));

        let parent_node = self.arena.node_mut(parent);
        parent_node.insert_key_at(child_index, median);
        parent_node.insert_child_at(child_index, sibling);

        TreeStats::bump(&self.stats.splits);
        debug!(
            parent = %parent,
            child = %child,
            sibling = %sibling,
            child_index,
            median_index = t - 1,
            "split child"
        );

        self.write_node(sibling);
        self.write_node(child);
        self.write_node(parent);
    }

    // ========================================================================
    // Public API: Diagnostics
    // ========================================================================

    /// All keys in ascending order (duplicates included).
    ///
    /// Visits `children[0], keys[0], children[1], keys[1], ...` recursively.
    pub fn in_order(&self) -> Vec<&K> {
        let mut out = Vec::with_capacity(self.len);
        self.collect_in_order(self.root, &mut out);
        out
    }

    fn collect_in_order<'a>(&'a self, id: NodeId, out: &mut Vec<&'a K>) {
        let node = self.arena.node(id);
        for (i, key) in node.keys().iter().enumerate() {
            if let Some(child) = node.child(i) {
                self.collect_in_order(child, out);
            }
            out.push(key);
        }
        if let Some(last) = node.child(node.key_count()) {
            self.collect_in_order(last, out);
        }
    }

    /// Verify every structural invariant.
    ///
    /// # Errors
    /// - `Error::Corrupted` describing the first violation found
    pub fn check_invariants(&self) -> Result<()> {
        let mut leaf_depth = None;
        let counted = self.check_subtree(self.root, 0, None, None, &mut leaf_depth)?;
        if counted != self.len {
            return Err(Error::Corrupted(format!(
                "tree reports {} keys but holds {}",
                self.len, counted
            )));
        }
        Ok(())
    }

    /// Check the subtree at `id` and return its key count.
    fn check_subtree(
        &self,
        id: NodeId,
        depth: usize,
        lower: Option<&K>,
        upper: Option<&K>,
        leaf_depth: &mut Option<usize>,
    ) -> Result<usize> {
        let node = self
            .arena
            .get(id)
            .ok_or_else(|| Error::Corrupted(format!("dangling child handle {}", id)))?;
        let count = node.key_count();

        if count > self.config.max_keys() {
            return Err(Error::Corrupted(format!(
                "{} holds {} keys, max is {}",
                id,
                count,
                self.config.max_keys()
            )));
        }
        if id != self.root && count < self.config.min_keys() {
            return Err(Error::Corrupted(format!(
                "{} holds {} keys, min is {}",
                id,
                count,
                self.config.min_keys()
            )));
        }
        if node.keys().windows(2).any(|pair| pair[0] > pair[1]) {
            return Err(Error::Corrupted(format!("{} keys out of order", id)));
        }
        let out_of_range = node.keys().iter().any(|key| {
            lower.is_some_and(|low| key < low) || upper.is_some_and(|high| key > high)
        });
        if out_of_range {
            return Err(Error::Corrupted(format!(
                "{} has a key outside its separator range",
                id
            )));
        }

        if node.is_leaf() {
            match *leaf_depth {
                None => *leaf_depth = Some(depth),
                Some(expected) if expected != depth => {
                    return Err(Error::Corrupted(format!(
                        "leaf {} at depth {}, expected {}",
                        id, depth, expected
                    )));
                }
                Some(_) => {}
            }
            return Ok(count);
        }

        if node.children().len() != count + 1 {
            return Err(Error::Corrupted(format!(
                "{} has {} keys but {} children",
                id,
                count,
                node.children().len()
            )));
        }

        let mut total = count;
        for (i, &child) in node.children().iter().enumerate() {
            let child_lower = if i == 0 { lower } else { node.key(i - 1) };
            let child_upper = if i == count { upper } else { node.key(i) };
            total += self.check_subtree(child, depth + 1, child_lower, child_upper, leaf_depth)?;
        }
        Ok(total)
    }
}

impl<K> BTree<K> {
    /// The minimum degree `t`.
    #[inline]
    pub fn min_degree(&self) -> usize {
        self.config.min_degree
    }

    /// The configuration this tree was built with.
    #[inline]
    pub fn config(&self) -> &BTreeConfig {
        &self.config
    }

    /// Handle of the current root.
    #[inline]
    pub fn root_id(&self) -> NodeId {
        self.root
    }

    /// The current root node. Never absent; an empty tree has an empty leaf.
    #[inline]
    pub fn root(&self) -> &Node<K> {
        self.arena.node(self.root)
    }

    /// Node behind `id`, or `None` if this tree never issued it.
    #[inline]
    pub fn node(&self, id: NodeId) -> Option<&Node<K>> {
        self.arena.get(id)
    }

    /// Number of stored keys, duplicates included.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// True iff no key has been inserted.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of allocated nodes.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    /// Edges from the root to any leaf. A lone root leaf has height 0.
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut current = self.arena.node(self.root);
        while let Some(first) = current.child(0) {
            current = self.arena.node(first);
            height += 1;
        }
        height
    }

    /// Operation counters.
    #[inline]
    pub fn stats(&self) -> &TreeStats {
        &self.stats
    }

    fn read_node(&self, id: NodeId) -> &Node<K> {
        let node = self.arena.node(id);
        self.hooks.on_node_read(id, node);
        TreeStats::bump(&self.stats.node_reads);
        node
    }

    fn write_node(&self, id: NodeId) {
        self.hooks.on_node_written(id, self.arena.node(id));
        TreeStats::bump(&self.stats.node_writes);
    }
}

impl<K: PartialEq> BTree<K> {
    fn subtree_eq(&self, a: NodeId, other: &Self, b: NodeId) -> bool {
        let left = self.arena.node(a);
        let right = other.arena.node(b);

        left.keys() == right.keys()
            && left.children().len() == right.children().len()
            && left
                .children()
                .iter()
                .zip(right.children())
                .all(|(&l, &r)| self.subtree_eq(l, other, r))
    }
}

/// Structural equality: same keys in the same node shapes, recursively.
///
/// Node handles and the minimum degree are not compared.
impl<K: PartialEq> PartialEq for BTree<K> {
    fn eq(&self, other: &Self) -> bool {
        self.subtree_eq(self.root, other, other.root)
    }
}

impl<K: fmt::Debug> fmt::Debug for BTree<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BTree")
            .field("min_degree", &self.config.min_degree)
            .field("len", &self.len)
            .field("root", &self.root)
            .field("nodes", &self.arena.len())
            .finish_non_exhaustive()
    }
}

impl<K: fmt::Display> BTree<K> {
    fn fmt_subtree(&self, id: NodeId, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = self.arena.node(id);
        if node.is_leaf() {
            return write!(f, "{}", node);
        }

        write!(f, "({}, (", node)?;
        for (i, &child) in node.children().iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            self.fmt_subtree(child, f)?;
        }
        write!(f, "))")
    }
}

/// Renders a leaf as `[k0 k1 ...]` and an internal node as
/// `([k0 ...], (child0,child1,...))`.
impl<K: fmt::Display> fmt::Display for BTree<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_subtree(self.root, f)
    }
}
