//! Extension points for a storage layer.
//!
//! The tree is fully memory resident, but it announces when a node's
//! contents are about to be trusted ([`NodeHooks::on_node_read`]) and when a
//! node's shape is final for the current step
//! ([`NodeHooks::on_node_written`]). A paging layer implements
//! [`NodeHooks`] and is injected at construction; nothing has to subclass
//! the tree.
//!
//! - [`NoopHooks`] - Default, does nothing
//! - [`RecordingHooks`] - Keeps an ordered event log, handy in tests

use parking_lot::Mutex;

use crate::common::NodeId;

use super::node::Node;

/// Callbacks invoked by the tree around node access.
///
/// Both methods default to no-ops. They take `&self` because lookups only
/// borrow the tree; implementations that keep state use interior
/// mutability. Hooks must be `Send + Sync` so a tree holding them can be
/// shared behind a lock.
pub trait NodeHooks<K>: Send + Sync {
    /// Called before the contents of node `id` are used.
    fn on_node_read(&self, id: NodeId, node: &Node<K>) {
        let _ = (id, node);
    }

    /// Called after node `id` reaches its final shape for a step.
    fn on_node_written(&self, id: NodeId, node: &Node<K>) {
        let _ = (id, node);
    }
}

/// Hooks that do nothing. Used when no storage layer is attached.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHooks;

impl<K> NodeHooks<K> for NoopHooks {}

/// One observed hook call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookEvent {
    Read(NodeId),
    Written(NodeId),
}

/// Hooks that record every call in order.
///
/// The log sits behind a `Mutex` so a clone of the `Arc` handed to the
/// tree can be inspected from outside.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use arbor::{BTree, BTreeConfig, HookEvent, RecordingHooks};
///
/// let hooks = Arc::new(RecordingHooks::new());
/// let mut tree = BTree::with_hooks(BTreeConfig::new(2), hooks.clone()).unwrap();
///
/// tree.insert(1);
/// assert_eq!(hooks.events(), vec![
///     HookEvent::Read(tree.root_id()),
///     HookEvent::Written(tree.root_id()),
/// ]);
/// ```
#[derive(Debug, Default)]
pub struct RecordingHooks {
    events: Mutex<Vec<HookEvent>>,
}

impl RecordingHooks {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }

    /// Copy of every event so far, oldest first.
    pub fn events(&self) -> Vec<HookEvent> {
        self.events.lock().clone()
    }

    /// Nodes passed to `on_node_read`, in call order.
    pub fn reads(&self) -> Vec<NodeId> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                HookEvent::Read(id) => Some(*id),
                HookEvent::Written(_) => None,
            })
            .collect()
    }

    /// Nodes passed to `on_node_written`, in call order.
    pub fn writes(&self) -> Vec<NodeId> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                HookEvent::Written(id) => Some(*id),
                HookEvent::Read(_) => None,
            })
            .collect()
    }

    /// Forget all recorded events.
    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl<K> NodeHooks<K> for RecordingHooks {
    fn on_node_read(&self, id: NodeId, _node: &Node<K>) {
        self.events.lock().push(HookEvent::Read(id));
    }

    fn on_node_written(&self, id: NodeId, _node: &Node<K>) {
        self.events.lock().push(HookEvent::Written(id));
    }
}

// Lets callers keep a handle on their hooks after giving them to a tree.
impl<K, H: NodeHooks<K> + ?Sized> NodeHooks<K> for std::sync::Arc<H> {
    fn on_node_read(&self, id: NodeId, node: &Node<K>) {
        (**self).on_node_read(id, node);
    }

    fn on_node_written(&self, id: NodeId, node: &Node<K>) {
        (**self).on_node_written(id, node);
    }
}
