//! Configuration for Arbor trees.

use crate::common::{Error, Result};

/// Smallest legal minimum degree.
///
/// Below this the `t-1 ..= 2t-1` key-count bound degenerates: with `t = 1`
/// a non-root node could hold zero keys and a split would have no median.
pub const MIN_DEGREE_FLOOR: usize = 2;

/// Minimum degree used by [`BTreeConfig::default`].
///
/// `t = 2` gives a 2-3-4 tree: 1 to 3 keys and 2 to 4 children per node.
pub const DEFAULT_MIN_DEGREE: usize = 2;

/// Shape parameters for a [`BTree`](crate::BTree).
///
/// Fixed at construction and immutable for the tree's lifetime.
///
/// # Example
/// ```
/// use arbor::BTreeConfig;
///
/// let config = BTreeConfig::new(3);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.max_keys(), 5);
/// assert_eq!(config.min_keys(), 2);
/// assert_eq!(config.max_children(), 6);
///
/// assert!(BTreeConfig::new(1).validate().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BTreeConfig {
    /// The minimum degree `t`.
    pub min_degree: usize,
}

impl BTreeConfig {
    /// Create a config with the given minimum degree. Not validated yet.
    pub fn new(min_degree: usize) -> Self {
        Self { min_degree }
    }

    /// Check that the parameters describe a legal tree.
    ///
    /// # Errors
    /// - `Error::InvalidArgument` if `min_degree < 2`
    pub fn validate(&self) -> Result<()> {
        if self.min_degree < MIN_DEGREE_FLOOR {
            return Err(Error::invalid_min_degree(self.min_degree));
        }
        Ok(())
    }

    /// Maximum keys per node (`2t - 1`).
    #[inline]
    pub fn max_keys(&self) -> usize {
        2 * self.min_degree - 1
    }

    /// Minimum keys per non-root node (`t - 1`).
    #[inline]
    pub fn min_keys(&self) -> usize {
        self.min_degree - 1
    }

    /// Maximum children per internal node (`2t`).
    #[inline]
    pub fn max_children(&self) -> usize {
        2 * self.min_degree
    }
}

impl Default for BTreeConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_DEGREE)
    }
}
