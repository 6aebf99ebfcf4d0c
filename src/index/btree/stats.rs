//! B-tree operation statistics.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counters maintained by a [`BTree`](crate::BTree).
///
/// Atomic so that [`BTree::search`](crate::BTree::search), which only
/// borrows the tree, can still count. All operations use
/// `Ordering::Relaxed`: counters are independent and only need atomicity.
///
/// # Example
/// ```
/// use arbor::TreeStats;
/// use std::sync::atomic::Ordering;
///
/// let stats = TreeStats::new();
/// stats.splits.fetch_add(1, Ordering::Relaxed);
/// assert_eq!(stats.snapshot().splits, 1);
/// ```
#[derive(Debug)]
pub struct TreeStats {
    /// Number of keys inserted.
    pub inserts: AtomicU64,

    /// Number of lookups performed.
    pub searches: AtomicU64,

    /// Number of node splits, root splits included.
    pub splits: AtomicU64,

    /// Number of root splits (each one adds a level).
    pub root_splits: AtomicU64,

    /// Number of `on_node_read` hook calls.
    pub node_reads: AtomicU64,

    /// Number of `on_node_written` hook calls.
    pub node_writes: AtomicU64,
}

impl TreeStats {
    /// Create a new stats tracker with all counters at zero.
    pub fn new() -> Self {
        Self {
            inserts: AtomicU64::new(0),
            searches: AtomicU64::new(0),
            splits: AtomicU64::new(0),
            root_splits: AtomicU64::new(0),
            node_reads: AtomicU64::new(0),
            node_writes: AtomicU64::new(0),
        }
    }

    #[inline]
    pub(crate) fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a snapshot of current statistics.
    ///
    /// This returns a non-atomic copy for display/logging.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            inserts: self.inserts.load(Ordering::Relaxed),
            searches: self.searches.load(Ordering::Relaxed),
            splits: self.splits.load(Ordering::Relaxed),
            root_splits: self.root_splits.load(Ordering::Relaxed),
            node_reads: self.node_reads.load(Ordering::Relaxed),
            node_writes: self.node_writes.load(Ordering::Relaxed),
        }
    }

    /// Reset all counters to zero.
    pub fn reset(&self) {
        self.inserts.store(0, Ordering::Relaxed);
        self.searches.store(0, Ordering::Relaxed);
        self.splits.store(0, Ordering::Relaxed);
        self.root_splits.store(0, Ordering::Relaxed);
        self.node_reads.store(0, Ordering::Relaxed);
        self.node_writes.store(0, Ordering::Relaxed);
    }
}

impl Default for TreeStats {
    fn default() -> Self {
        Self::new()
    }
}

/// A point-in-time snapshot of tree statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub inserts: u64,
    pub searches: u64,
    pub splits: u64,
    pub root_splits: u64,
    pub node_reads: u64,
    pub node_writes: u64,
}

impl fmt::Display for StatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Stats {{ inserts: {}, searches: {}, splits: {}, root_splits: {} }}",
            self.inserts, self.searches, self.splits, self.root_splits
        )
    }
}
