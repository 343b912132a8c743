//! Running average reducer

use crate::reducer::Reducer;
use serde::{Deserialize, Serialize};
use xf_record::{Field, Measure, Record};

/// Accumulator of [`RunningAverage`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AverageAcc {
    /// Records with a numeric value
    pub count: u64,
    /// Sum of their values
    pub total: i64,
}

impl AverageAcc {
    /// `total / count`, or 0 for an empty set
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn average(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total as f64 / self.count as f64
        }
    }
}

/// Mean of a numeric field over the records in a group
///
/// Records whose field is non-numeric are skipped on both add and remove,
/// so they never poison the total. When the count drops back to zero the
/// total is reset to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunningAverage {
    field: Field,
}

impl RunningAverage {
    /// Average of a field
    #[inline]
    #[must_use]
    pub fn new(field: Field) -> Self {
        Self { field }
    }

    /// Average salary
    #[inline]
    #[must_use]
    pub fn salary() -> Self {
        Self::new(Field::Salary)
    }

    /// Field being averaged
    #[inline]
    #[must_use]
    pub fn field(&self) -> Field {
        self.field
    }
}

impl Reducer for RunningAverage {
    type Acc = AverageAcc;

    fn initial(&self) -> AverageAcc {
        AverageAcc::default()
    }

    fn add(&self, acc: &mut AverageAcc, record: &Record) {
        if let Measure::Value(v) = self.field.measure(record) {
            acc.count += 1;
            acc.total = acc.total.wrapping_add(v);
        }
    }

    fn remove(&self, acc: &mut AverageAcc, record: &Record) {
        if let Measure::Value(v) = self.field.measure(record) {
            debug_assert!(acc.count > 0, "removed a record that was never added");
            acc.count = acc.count.saturating_sub(1);
            if acc.count == 0 {
                acc.total = 0;
            } else {
                acc.total = acc.total.wrapping_sub(v);
            }
        }
    }

    fn value(&self, acc: &AverageAcc) -> f64 {
        acc.average()
    }

    fn name(&self) -> &'static str {
        "RunningAverage"
    }
}
