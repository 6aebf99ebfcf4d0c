//! B-tree index implementation.
//!
//! An ordered, multi-way search tree kept balanced by a minimum-degree
//! invariant: every non-root node holds between `t-1` and `2t-1` keys and
//! all leaves sit at the same depth.
//!
//! # Components
//! - [`BTree`] - The engine: search, insert, split/promote
//! - [`Node`] - Key and child-handle storage for one node
//! - [`NodeHooks`] - Extension points for a paging layer
//! - [`TreeStats`] - Operation counters
//!
//! Nodes live in an arena owned by the tree and point at their children by
//! [`NodeId`](crate::NodeId), so splits only move handles.

mod arena;
mod hooks;
mod node;
mod stats;
mod tree;

pub use hooks::{HookEvent, NodeHooks, NoopHooks, RecordingHooks};
pub use node::Node;
pub use stats::{StatsSnapshot, TreeStats};
pub use tree::{BTree, SearchResult};
