//! Arbor - an in-memory B-tree index with pluggable node persistence hooks.
//!
//! # Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                             Arbor                               │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │                Index Layer (index/btree)                 │   │
//! │  │        BTree: search, insert, split/promote              │   │
//! │  │   ┌─────────────────────────────────────────────────┐   │   │
//! │  │   │  NodeArena: Vec<Node<K>> addressed by NodeId    │   │   │
//! │  │   └─────────────────────────────────────────────────┘   │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │                              ↓                                  │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │        Storage hooks (NodeHooks)  [Injectable]          │   │
//! │  │     on_node_read / on_node_written, no-op by default     │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//! - [`common`] - Shared primitives (NodeId, Error, config)
//! - [`index`] - Index structures (B-tree)
//!
//! # Quick Start
//! ```
//! use arbor::BTree;
//!
//! // A 2-3-4 tree
//! let mut tree = BTree::new(2).unwrap();
//! for key in [10, 20, 5, 6, 12, 30, 7, 17] {
//!     tree.insert(key);
//! }
//!
//! assert!(tree.contains(&17));
//! assert_eq!(tree.in_order(), vec![&5, &6, &7, &10, &12, &17, &20, &30]);
//! assert!(BTree::<i32>::new(1).is_err());
//! ```

pub mod common;
pub mod index;

// Re-export commonly used items at crate root for convenience
pub use common::config::{DEFAULT_MIN_DEGREE, MIN_DEGREE_FLOOR};
pub use common::{BTreeConfig, Error, NodeId, Result};

pub use index::btree::{
    BTree, HookEvent, Node, NodeHooks, NoopHooks, RecordingHooks, SearchResult, StatsSnapshot,
    TreeStats,
};
