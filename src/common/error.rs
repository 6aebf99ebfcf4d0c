//! Error types for Arbor.

use thiserror::Error;

/// Convenient Result type alias.
///
/// Instead of writing `Result<T, Error>` everywhere, we can write `Result<T>`.
pub type Result<T> = std::result::Result<T, Error>;

/// All possible errors in Arbor.
///
/// Lookups and insertions are total over a well-formed tree, so the only
/// fallible points are construction and the structural self-check.
#[derive(Debug, Error)]
pub enum Error {
    /// A constructor argument is outside its legal range.
    ///
    /// Raised when a tree is built with `min_degree < 2`. No tree is produced.
    #[error("invalid argument: {name} = {value} ({reason})")]
    InvalidArgument {
        name: &'static str,
        value: String,
        reason: &'static str,
    },

    /// A structural invariant does not hold.
    ///
    /// Only [`BTree::check_invariants`](crate::BTree::check_invariants)
    /// reports this; it indicates a bug, not a recoverable condition.
    #[error("B-tree corrupted: {0}")]
    Corrupted(String),
}

impl Error {
    /// Build an `InvalidArgument` for a bad minimum degree.
    pub(crate) fn invalid_min_degree(min_degree: usize) -> Self {
        Error::InvalidArgument {
            name: "min_degree",
            value: min_degree.to_string(),
            reason: "minimum degree must be >= 2",
        }
    }
}
