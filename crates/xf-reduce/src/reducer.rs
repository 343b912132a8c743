//! Reducer trait and the default counting reducer
//!
//! Provides the [`Reducer`] trait that every group aggregation plugs into.

use xf_record::Record;

/// Incremental aggregation over a changing set of records
///
/// # Laws
/// Implementations must keep `remove` the exact inverse of `add` and make
/// the accumulator independent of the order records arrive in. The
/// coordinator relies on both: it only ever replays the records that crossed
/// a filter boundary.
pub trait Reducer: Send + Sync + std::fmt::Debug + 'static {
    /// Per-key aggregate state
    type Acc: Clone + PartialEq + std::fmt::Debug + Send + Sync + 'static;

    /// Accumulator of an empty set
    fn initial(&self) -> Self::Acc;

    /// Fold a record in
    fn add(&self, acc: &mut Self::Acc, record: &Record);

    /// Fold a previously added record out
    fn remove(&self, acc: &mut Self::Acc, record: &Record);

    /// Displayed value of an accumulator
    ///
    /// Derived ratios are computed here, lazily, and must be `0.0` when the
    /// underlying count is zero.
    fn value(&self, acc: &Self::Acc) -> f64;

    /// Reducer name (for debugging/serialization)
    fn name(&self) -> &'static str;
}

/// Counts records
///
/// The default reducer of a group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Count;

impl Count {
    /// Create new counting reducer
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Reducer for Count {
    type Acc = u64;

    fn initial(&self) -> u64 {
        0
    }

    fn add(&self, acc: &mut u64, _record: &Record) {
        *acc += 1;
    }

    fn remove(&self, acc: &mut u64, _record: &Record) {
        debug_assert!(*acc > 0, "removed a record that was never added");
        *acc = acc.saturating_sub(1);
    }

    #[allow(clippy::cast_precision_loss)]
    fn value(&self, acc: &u64) -> f64 {
        *acc as f64
    }

    fn name(&self) -> &'static str {
        "Count"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xf_record::{Rank, Sex};

    #[test]
    fn count_add_remove() {
        let r = Record::new("A", Sex::Male, Rank::Prof, 1, 1, 1);
        let count = Count::new();
        let mut acc = count.initial();

        count.add(&mut acc, &r);
        count.add(&mut acc, &r);
        assert_eq!(count.value(&acc), 2.0);

        count.remove(&mut acc, &r);
        count.remove(&mut acc, &r);
        assert_eq!(acc, count.initial());
        assert_eq!(count.name(), "Count");
    }
}
