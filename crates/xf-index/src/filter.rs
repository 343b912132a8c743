//! Dimension filters
//!
//! A dimension holds at most one [`Filter`]. Setting a filter replaces the
//! previous one; the change is reported as a [`FilterDelta`] listing the
//! records whose pass state on that dimension flipped.

use serde::{Deserialize, Serialize};
use xf_record::{Key, RecordId};

/// Predicate over a dimension's keys
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Filter {
    /// Key equals the value
    Exact(Key),
    /// Key equals any of the values
    AnyOf(Vec<Key>),
    /// Key lies in the half-open interval `[lo, hi)`
    Range {
        /// Inclusive lower bound
        lo: Key,
        /// Exclusive upper bound
        hi: Key,
    },
}

impl Filter {
    /// Filter matching a single value
    #[inline]
    #[must_use]
    pub fn exact(key: impl Into<Key>) -> Self {
        Filter::Exact(key.into())
    }

    /// Filter matching any of several values
    #[must_use]
    pub fn any_of<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<Key>,
    {
        Filter::AnyOf(keys.into_iter().map(Into::into).collect())
    }

    /// Test a key
    #[must_use]
    pub fn matches(&self, key: &Key) -> bool {
        match self {
            Filter::Exact(k) => k == key,
            Filter::AnyOf(keys) => keys.contains(key),
            Filter::Range { lo, hi } => lo <= key && key < hi,
        }
    }
}

/// Pass-state changes caused by replacing a dimension's filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterDelta {
    /// Records that now pass the dimension's filter
    pub entered: Vec<RecordId>,
    /// Records that no longer pass it
    pub exited: Vec<RecordId>,
}

impl FilterDelta {
    /// Whether nothing changed
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entered.is_empty() && self.exited.is_empty()
    }

    /// Number of records whose state flipped
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entered.len() + self.exited.len()
    }
}
