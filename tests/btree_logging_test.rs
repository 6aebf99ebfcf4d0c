//! Diagnostic events emitted by the tree.
//!
//! Each test installs a capturing subscriber for its own thread only, so the
//! events seen are exactly the ones the test triggers.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

use arbor::BTree;

/// One captured event: its message plus `name=value` pairs for the rest.
#[derive(Debug, Clone)]
struct Captured {
    level: Level,
    message: String,
    fields: Vec<String>,
}

impl Captured {
    fn has(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f == field)
    }
}

#[derive(Default)]
struct FieldVisitor {
    message: String,
    fields: Vec<String>,
}

impl Visit for FieldVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        } else {
            self.fields.push(format!("{}={:?}", field.name(), value));
        }
    }
}

#[derive(Clone, Default)]
struct CaptureLayer {
    events: Arc<Mutex<Vec<Captured>>>,
}

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);
        self.events.lock().push(Captured {
            level: *event.metadata().level(),
            message: visitor.message,
            fields: visitor.fields,
        });
    }
}

fn capture<R>(f: impl FnOnce() -> R) -> (R, Vec<Captured>) {
    let layer = CaptureLayer::default();
    let events = Arc::clone(&layer.events);
    let subscriber = tracing_subscriber::registry().with(layer);
    let result = tracing::subscriber::with_default(subscriber, f);
    let captured = events.lock().clone();
    (result, captured)
}

fn messages(events: &[Captured]) -> Vec<&str> {
    events.iter().map(|e| e.message.as_str()).collect()
}

// ============================================================================
// Lookup
// ============================================================================

#[test]
fn test_search_miss_is_traced() {
    let mut tree = BTree::new(2).unwrap();
    for key in [10, 20, 30] {
        tree.insert(key);
    }

    let (found, events) = capture(|| tree.search(&15).is_some());
    assert!(!found);
    assert_eq!(messages(&events), vec!["search", "search miss"]);
    assert!(events.iter().all(|e| e.level == Level::TRACE));
    assert!(events[1].has("leaf=Node(0)"));
}

#[test]
fn test_search_hit_is_traced() {
    let mut tree = BTree::new(2).unwrap();
    tree.insert(7);

    let (_, events) = capture(|| tree.search(&7).map(|hit| hit.index()));
    assert_eq!(messages(&events), vec!["search", "search hit"]);
    assert!(events[1].has("index=0"));
}

// ============================================================================
// Insertion
// ============================================================================

#[test]
fn test_insert_entry_is_traced() {
    let mut tree = BTree::new(2).unwrap();

    let (_, events) = capture(|| tree.insert(1));
    assert_eq!(messages(&events), vec!["insert", "inserted key"]);
    assert!(events[0].has("len=0"));
}

#[test]
fn test_split_reports_median_position() {
    for t in [2usize, 3, 5] {
        let mut tree = BTree::new(t).unwrap();
        for key in 0..(2 * t - 1) as i32 {
            tree.insert(key);
        }

        let (_, events) = capture(|| tree.insert(1000));
        let split = events
            .iter()
            .find(|e| e.message == "split child")
            .expect("split event");
        assert_eq!(split.level, Level::DEBUG);
        assert!(split.has(&format!("median_index={}", t - 1)), "{:?}", split);
        assert!(split.has("child_index=0"));
        assert!(split.has("parent=Node(1)"));
        assert!(split.has("sibling=Node(2)"));

        assert!(events.iter().any(|e| e.message == "root split"));
    }
}
