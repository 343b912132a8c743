//! Keyed dimensions
//!
//! A [`Dimension`] projects every record onto a [`Key`] once, at creation,
//! and keeps record ids sorted by `(key, id)` so range queries walk the order
//! instead of sorting. Filters only change which records pass; keys never
//! change after load.

use crate::filter::{Filter, FilterDelta};
use crate::mask::FilterMask;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use xf_record::{Field, Key, Point, Record, RecordId, RecordStore};

/// Position of a dimension in its crossfilter; also its filter bit
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DimensionId(pub usize);

impl DimensionId {
    /// Position in the owning crossfilter
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }

    /// Mask bit of this dimension (zero if out of range)
    #[inline]
    #[must_use]
    pub fn bit(self) -> u64 {
        u32::try_from(self.0)
            .ok()
            .and_then(|shift| 1u64.checked_shl(shift))
            .unwrap_or(0)
    }
}

impl fmt::Display for DimensionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dim#{}", self.0)
    }
}

/// Key function for custom dimensions
pub type KeyFn = Arc<dyn Fn(RecordId, &Record) -> Key + Send + Sync>;

/// How a dimension derives keys from records
#[derive(Clone)]
pub enum DimensionSpec {
    /// Key is one field's value
    Field(Field),
    /// Key is an `(x, y, record)` point, one entry per record
    Point {
        /// Horizontal field
        x: Field,
        /// Vertical field
        y: Field,
    },
    /// Key computed by a caller-supplied function
    Custom {
        /// Name used in logs and debug output
        label: String,
        /// Key function
        key: KeyFn,
    },
}

impl DimensionSpec {
    /// Custom dimension from a closure
    #[must_use]
    pub fn custom<F>(label: impl Into<String>, key: F) -> Self
    where
        F: Fn(RecordId, &Record) -> Key + Send + Sync + 'static,
    {
        DimensionSpec::Custom {
            label: label.into(),
            key: Arc::new(key),
        }
    }

    /// Human-readable name
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            DimensionSpec::Field(field) => field.source_name().to_string(),
            DimensionSpec::Point { x, y } => format!("{x}/{y}"),
            DimensionSpec::Custom { label, .. } => label.clone(),
        }
    }

    /// Key of one record
    #[must_use]
    pub fn key_of(&self, id: RecordId, record: &Record) -> Key {
        match self {
            DimensionSpec::Field(field) => field.key(record),
            DimensionSpec::Point { x, y } => Key::Point(Point {
                x: x.measure(record),
                y: y.measure(record),
                record: id,
            }),
            DimensionSpec::Custom { key, .. } => key(id, record),
        }
    }
}

impl fmt::Debug for DimensionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DimensionSpec::Field(field) => f.debug_tuple("Field").field(field).finish(),
            DimensionSpec::Point { x, y } => {
                f.debug_struct("Point").field("x", x).field("y", y).finish()
            }
            DimensionSpec::Custom { label, .. } => {
                f.debug_struct("Custom").field("label", label).finish_non_exhaustive()
            }
        }
    }
}

/// Keyed projection of the record store
#[derive(Debug, Clone)]
pub struct Dimension {
    id: DimensionId,
    label: String,
    /// Key per record, indexed by record id
    keys: Vec<Key>,
    /// Record ids sorted ascending by `(key, id)`
    order: Vec<RecordId>,
    filter: Option<Filter>,
}

impl Dimension {
    /// Project every record of the store
    #[must_use]
    pub fn new(id: DimensionId, spec: &DimensionSpec, store: &RecordStore) -> Self {
        let keys: Vec<Key> = store.iter().map(|(rid, r)| spec.key_of(rid, r)).collect();
        let mut order: Vec<RecordId> = store.ids().collect();
        order.sort_by(|a, b| keys[a.index()].cmp(&keys[b.index()]).then(a.cmp(b)));

        Self {
            id,
            label: spec.label(),
            keys,
            order,
            filter: None,
        }
    }

    /// Dimension id
    #[inline]
    #[must_use]
    pub fn id(&self) -> DimensionId {
        self.id
    }

    /// Human-readable name
    #[inline]
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Key of a record
    #[inline]
    #[must_use]
    pub fn key(&self, id: RecordId) -> Option<&Key> {
        self.keys.get(id.index())
    }

    /// Record ids ascending by key, ties in encounter order
    #[inline]
    #[must_use]
    pub fn order(&self) -> &[RecordId] {
        &self.order
    }

    /// Every distinct key, ascending
    #[must_use]
    pub fn distinct_keys(&self) -> Vec<Key> {
        let mut out: Vec<Key> = Vec::new();
        for id in &self.order {
            let key = &self.keys[id.index()];
            if out.last() != Some(key) {
                out.push(key.clone());
            }
        }
        out
    }

    /// Current filter
    #[inline]
    #[must_use]
    pub fn filter(&self) -> Option<&Filter> {
        self.filter.as_ref()
    }

    /// Record passes this dimension's own filter
    #[must_use]
    pub fn passes(&self, id: RecordId) -> bool {
        match (&self.filter, self.key(id)) {
            (None, _) => true,
            (Some(filter), Some(key)) => filter.matches(key),
            (Some(_), None) => false,
        }
    }

    /// Replace the filter, reporting records whose pass state flipped
    ///
    /// `None` clears the filter. Ids in the delta are ascending.
    pub fn replace_filter(&mut self, filter: Option<Filter>) -> FilterDelta {
        let old = self.filter.take();
        let mut delta = FilterDelta::default();

        for (index, key) in self.keys.iter().enumerate() {
            let was = old.as_ref().map_or(true, |f| f.matches(key));
            let now = filter.as_ref().map_or(true, |f| f.matches(key));
            if was != now {
                // keys has one entry per store record, bounded by u32
                #[allow(clippy::cast_possible_truncation)]
                let id = RecordId(index as u32);
                if now {
                    delta.entered.push(id);
                } else {
                    delta.exited.push(id);
                }
            }
        }

        tracing::trace!(
            dimension = %self.id,
            label = %self.label,
            entered = delta.entered.len(),
            exited = delta.exited.len(),
            "filter replaced"
        );
        self.filter = filter;
        delta
    }

    /// Up to `n` records with the smallest keys among records passing every
    /// filter; equal keys come out in encounter order
    ///
    /// Records with a [`Key::Missing`] key are skipped.
    #[must_use]
    pub fn bottom(&self, n: usize, mask: &FilterMask) -> Vec<RecordId> {
        self.order
            .iter()
            .copied()
            .filter(|id| !self.keys[id.index()].is_missing() && mask.passes_all(*id))
            .take(n)
            .collect()
    }

    /// Up to `n` records with the largest keys among records passing every
    /// filter; equal keys come out in encounter order
    ///
    /// Records with a [`Key::Missing`] key are skipped.
    #[must_use]
    pub fn top(&self, n: usize, mask: &FilterMask) -> Vec<RecordId> {
        let mut out = Vec::with_capacity(n.min(self.order.len()));
        let mut end = self.order.len();

        // Walk runs of equal keys from the largest down; inside a run the
        // order is already ascending by id.
        while end > 0 && out.len() < n {
            let key = &self.keys[self.order[end - 1].index()];
            let mut start = end - 1;
            while start > 0 && self.keys[self.order[start - 1].index()] == *key {
                start -= 1;
            }

            if !key.is_missing() {
                for &id in &self.order[start..end] {
                    if out.len() == n {
                        break;
                    }
                    if mask.passes_all(id) {
                        out.push(id);
                    }
                }
            }
            end = start;
        }

        out
    }

    /// Number of records projected
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Check if the dimension has no records
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use xf_record::{Measure, Rank, Sex};

    fn store() -> RecordStore {
        RecordStore::new(vec![
            Record::new("A", Sex::Male, Rank::Prof, 150, 20, 10),
            Record::new("B", Sex::Female, Rank::AsstProf, 90, 3, 2),
            Record::new("A", Sex::Male, Rank::AssocProf, 110, 9, 10),
            Record {
                yrs_service: Measure::NonNumeric,
                ..Record::new("B", Sex::Female, Rank::Prof, 130, 15, 0)
            },
            Record::new("A", Sex::Female, Rank::Prof, 140, 25, 2),
        ])
        .unwrap()
    }

    fn dim(spec: DimensionSpec, store: &RecordStore) -> Dimension {
        Dimension::new(DimensionId(0), &spec, store)
    }

    #[test]
    fn dimension_bit() {
        assert_eq!(DimensionId(0).bit(), 1);
        assert_eq!(DimensionId(63).bit(), 1 << 63);
        assert_eq!(DimensionId(64).bit(), 0);
    }

    #[test]
    fn distinct_keys_are_sorted() {
        let s = store();
        let d = dim(DimensionSpec::Field(Field::Discipline), &s);
        assert_eq!(d.distinct_keys(), vec![Key::from("A"), Key::from("B")]);

        let service = dim(DimensionSpec::Field(Field::YrsService), &s);
        assert_eq!(
            service.distinct_keys(),
            vec![Key::Missing, Key::Int(2), Key::Int(10)]
        );
    }

    #[test]
    fn point_dimension_has_one_key_per_record() {
        let s = store();
        let d = dim(DimensionSpec::Point { x: Field::YrsService, y: Field::Salary }, &s);
        assert_eq!(d.distinct_keys().len(), s.len());
        let point = d.key(RecordId(2)).and_then(Key::as_point).unwrap();
        assert_eq!(point.record, RecordId(2));
        assert_eq!(point.y, Measure::Value(110));
    }

    #[test]
    fn replace_filter_reports_flips() {
        let s = store();
        let mut d = dim(DimensionSpec::Field(Field::Sex), &s);

        let delta = d.replace_filter(Some(Filter::exact("Female")));
        assert_eq!(delta.exited, vec![RecordId(0), RecordId(2)]);
        assert!(delta.entered.is_empty());
        assert!(!d.passes(RecordId(0)));

        let delta = d.replace_filter(Some(Filter::exact("Male")));
        assert_eq!(delta.entered, vec![RecordId(0), RecordId(2)]);
        assert_eq!(delta.exited, vec![RecordId(1), RecordId(3), RecordId(4)]);

        let delta = d.replace_filter(None);
        assert_eq!(delta.entered, vec![RecordId(1), RecordId(3), RecordId(4)]);
        assert!(d.filter().is_none());
    }

    #[test]
    fn bottom_and_top_break_ties_by_encounter_order() {
        let s = store();
        let d = dim(DimensionSpec::Field(Field::YrsService), &s);
        let mask = FilterMask::new(s.len());

        // Records 1 and 4 share the minimum, 0 and 2 the maximum.
        assert_eq!(d.bottom(1, &mask), vec![RecordId(1)]);
        assert_eq!(d.top(1, &mask), vec![RecordId(0)]);
        assert_eq!(d.top(3, &mask), vec![RecordId(0), RecordId(2), RecordId(1)]);
        assert_eq!(d.bottom(10, &mask).len(), 4, "missing key skipped");
    }

    #[test]
    fn range_queries_respect_every_filter() {
        let s = store();
        let service = dim(DimensionSpec::Field(Field::YrsService), &s);
        let mut sex = Dimension::new(DimensionId(1), &DimensionSpec::Field(Field::Sex), &s);
        let mut mask = FilterMask::new(s.len());

        let delta = sex.replace_filter(Some(Filter::exact("Female")));
        mask.apply(sex.id(), &delta);

        assert_eq!(service.top(1, &mask), vec![RecordId(1)]);
        assert_eq!(service.bottom(1, &mask), vec![RecordId(1)]);
    }

    #[test]
    fn custom_dimension() {
        let s = store();
        let d = dim(
            DimensionSpec::custom("salary band", |_, r| {
                Key::Int(r.salary.value().unwrap_or(0) / 50)
            }),
            &s,
        );
        assert_eq!(d.label(), "salary band");
        assert_eq!(d.distinct_keys(), vec![Key::Int(1), Key::Int(2), Key::Int(3)]);
        assert!(format!("{:?}", DimensionSpec::Field(Field::Rank)).contains("Rank"));
    }

    fn salary_store(rows: &[(Option<i64>, bool)]) -> RecordStore {
        RecordStore::new(
            rows.iter()
                .map(|&(salary, female)| {
                    let sex = if female { Sex::Female } else { Sex::Male };
                    Record {
                        salary: salary.map_or(Measure::NonNumeric, Measure::Value),
                        ..Record::new("A", sex, Rank::Prof, 0, 1, 1)
                    }
                })
                .collect(),
        )
        .unwrap()
    }

    proptest! {
        #[test]
        fn prop_range_queries_match_a_sorted_scan(
            rows in proptest::collection::vec((proptest::option::weighted(0.9, 0i64..20), any::<bool>()), 0..30),
            only_female in any::<Option<bool>>(),
            n in 0usize..10,
        ) {
            let s = salary_store(&rows);
            let salary = dim(DimensionSpec::Field(Field::Salary), &s);
            let mut sex = Dimension::new(DimensionId(1), &DimensionSpec::Field(Field::Sex), &s);
            let mut mask = FilterMask::new(s.len());
            if let Some(female) = only_female {
                let delta = sex.replace_filter(Some(Filter::exact(if female { "Female" } else { "Male" })));
                mask.apply(sex.id(), &delta);
            }

            let mut passing: Vec<(i64, u32)> = rows
                .iter()
                .zip(0u32..)
                .filter(|((_, female), _)| only_female.map_or(true, |f| f == *female))
                .filter_map(|((value, _), id)| value.map(|v| (v, id)))
                .collect();

            passing.sort_unstable();
            let expected_bottom: Vec<RecordId> = passing.iter().take(n).map(|&(_, id)| RecordId(id)).collect();
            prop_assert_eq!(salary.bottom(n, &mask), expected_bottom);

            passing.sort_unstable_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
            let expected_top: Vec<RecordId> = passing.iter().take(n).map(|&(_, id)| RecordId(id)).collect();
            prop_assert_eq!(salary.top(n, &mask), expected_top);
        }
    }
}
