//! Conditional reducers
//!
//! One parameterised construct for every "count the records that match"
//! series: the stacked rank sums are three [`ConditionalCount`]s, the
//! percent-professor displays are [`ConditionalRatio`]s.

use crate::reducer::Reducer;
use serde::{Deserialize, Serialize};
use xf_record::{Predicate, Rank, Record, Sex};

/// Counts records matching a predicate
///
/// Adds 1 for a matching record and 0 otherwise, so a group keyed by one
/// field yields the number of matching records per key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionalCount {
    predicate: Predicate,
}

impl ConditionalCount {
    /// Create counter for a predicate
    #[inline]
    #[must_use]
    pub fn new(predicate: Predicate) -> Self {
        Self { predicate }
    }

    /// Counter of records holding one rank
    #[inline]
    #[must_use]
    pub fn of_rank(rank: Rank) -> Self {
        Self::new(Predicate::Rank(rank))
    }

    /// Predicate being counted
    #[inline]
    #[must_use]
    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }
}

impl Reducer for ConditionalCount {
    type Acc = u64;

    fn initial(&self) -> u64 {
        0
    }

    fn add(&self, acc: &mut u64, record: &Record) {
        if self.predicate.matches(record) {
            *acc += 1;
        }
    }

    fn remove(&self, acc: &mut u64, record: &Record) {
        if self.predicate.matches(record) {
            debug_assert!(*acc > 0, "removed a record that was never added");
            *acc = acc.saturating_sub(1);
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn value(&self, acc: &u64) -> f64 {
        *acc as f64
    }

    fn name(&self) -> &'static str {
        "ConditionalCount"
    }
}

/// Accumulator of [`ConditionalRatio`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatioAcc {
    /// Records matching the base predicate
    pub count: u64,
    /// Of those, records also matching the subset predicate
    pub hits: u64,
}

impl RatioAcc {
    /// `hits / count`, or 0 for an empty base
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn ratio(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.hits as f64 / self.count as f64
        }
    }
}

/// Share of a base population that also matches a subset predicate
///
/// Records outside `base` are ignored entirely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionalRatio {
    base: Predicate,
    subset: Predicate,
}

impl ConditionalRatio {
    /// Create ratio reducer
    #[inline]
    #[must_use]
    pub fn new(base: Predicate, subset: Predicate) -> Self {
        Self { base, subset }
    }

    /// Share of one sex holding one rank
    #[inline]
    #[must_use]
    pub fn share_of_rank(sex: Sex, rank: Rank) -> Self {
        Self::new(Predicate::Sex(sex), Predicate::Rank(rank))
    }

    /// Base predicate
    #[inline]
    #[must_use]
    pub fn base(&self) -> &Predicate {
        &self.base
    }

    /// Subset predicate
    #[inline]
    #[must_use]
    pub fn subset(&self) -> &Predicate {
        &self.subset
    }
}

impl Reducer for ConditionalRatio {
    type Acc = RatioAcc;

    fn initial(&self) -> RatioAcc {
        RatioAcc::default()
    }

    fn add(&self, acc: &mut RatioAcc, record: &Record) {
        if self.base.matches(record) {
            acc.count += 1;
            if self.subset.matches(record) {
                acc.hits += 1;
            }
        }
    }

    fn remove(&self, acc: &mut RatioAcc, record: &Record) {
        if self.base.matches(record) {
            debug_assert!(acc.count > 0, "removed a record that was never added");
            acc.count = acc.count.saturating_sub(1);
            if self.subset.matches(record) {
                acc.hits = acc.hits.saturating_sub(1);
            }
        }
    }

    fn value(&self, acc: &RatioAcc) -> f64 {
        acc.ratio()
    }

    fn name(&self) -> &'static str {
        "ConditionalRatio"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(sex: Sex, rank: Rank) -> Record {
        Record::new("A", sex, rank, 100, 10, 5)
    }

    #[test]
    fn conditional_count_ignores_non_matching() {
        let assoc = ConditionalCount::of_rank(Rank::AssocProf);
        let mut acc = assoc.initial();

        assoc.add(&mut acc, &rec(Sex::Male, Rank::AssocProf));
        assoc.add(&mut acc, &rec(Sex::Male, Rank::Prof));
        assert_eq!(acc, 1);

        assoc.remove(&mut acc, &rec(Sex::Male, Rank::Prof));
        assert_eq!(acc, 1);
        assoc.remove(&mut acc, &rec(Sex::Male, Rank::AssocProf));
        assert_eq!(assoc.value(&acc), 0.0);
    }

    #[test]
    fn ratio_counts_only_base_population() {
        let share = ConditionalRatio::share_of_rank(Sex::Female, Rank::Prof);
        let mut acc = share.initial();

        share.add(&mut acc, &rec(Sex::Female, Rank::Prof));
        share.add(&mut acc, &rec(Sex::Female, Rank::AsstProf));
        share.add(&mut acc, &rec(Sex::Female, Rank::AsstProf));
        share.add(&mut acc, &rec(Sex::Male, Rank::Prof));
        assert_eq!(acc, RatioAcc { count: 3, hits: 1 });
        assert!((share.value(&acc) - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn ratio_of_empty_base_is_zero() {
        let share = ConditionalRatio::share_of_rank(Sex::Male, Rank::Prof);
        let mut acc = share.initial();
        assert_eq!(share.value(&acc), 0.0);

        let r = rec(Sex::Male, Rank::Prof);
        share.add(&mut acc, &r);
        assert_eq!(share.value(&acc), 1.0);
        share.remove(&mut acc, &r);
        assert_eq!(share.value(&acc), 0.0);
        assert!(!share.value(&acc).is_nan());
    }

    #[test]
    fn ratio_acc_serializes_with_field_names() {
        let json = serde_json::to_string(&RatioAcc { count: 2, hits: 1 }).unwrap();
        assert_eq!(json, r#"{"count":2,"hits":1}"#);
    }
}
