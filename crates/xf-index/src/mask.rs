//! Per-record filter masks
//!
//! Bit `d` of a record's mask is set while the record fails dimension `d`'s
//! filter. Cross-filter membership falls out of the mask:
//! - passes everything: mask is zero
//! - active in dimension `d`: mask with bit `d` cleared is zero

use crate::dimension::DimensionId;
use crate::filter::FilterDelta;
use xf_record::RecordId;

/// Number of dimensions one mask word can track
pub const MAX_DIMENSIONS: usize = 64;

/// Filter bits for every record of a store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterMask {
    bits: Vec<u64>,
}

impl FilterMask {
    /// All records passing, no filters set
    #[inline]
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self { bits: vec![0; len] }
    }

    /// Raw bits of a record
    #[inline]
    #[must_use]
    pub fn bits(&self, id: RecordId) -> u64 {
        self.bits.get(id.index()).copied().unwrap_or(0)
    }

    /// Record passes every filter
    #[inline]
    #[must_use]
    pub fn passes_all(&self, id: RecordId) -> bool {
        self.bits(id) == 0
    }

    /// Record passes every filter except possibly `dim`'s own
    #[inline]
    #[must_use]
    pub fn passes_except(&self, id: RecordId, dim: DimensionId) -> bool {
        Self::clear_except(self.bits(id), dim)
    }

    /// Whether `bits` is clear outside `dim`'s bit
    #[inline]
    #[must_use]
    pub fn clear_except(bits: u64, dim: DimensionId) -> bool {
        bits & !dim.bit() == 0
    }

    /// Set or clear `dim`'s bit for a record, returning `(before, after)`
    pub fn set(&mut self, id: RecordId, dim: DimensionId, failing: bool) -> (u64, u64) {
        let Some(slot) = self.bits.get_mut(id.index()) else {
            return (0, 0);
        };
        let before = *slot;
        if failing {
            *slot |= dim.bit();
        } else {
            *slot &= !dim.bit();
        }
        (before, *slot)
    }

    /// Apply a whole delta for one dimension
    pub fn apply(&mut self, dim: DimensionId, delta: &FilterDelta) {
        for &id in &delta.exited {
            self.set(id, dim, true);
        }
        for &id in &delta.entered {
            self.set(id, dim, false);
        }
    }

    /// Records passing every filter
    #[must_use]
    pub fn count_passing(&self) -> usize {
        self.bits.iter().filter(|&&b| b == 0).count()
    }

    /// Number of records tracked
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Check if no records are tracked
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn own_bit_does_not_exclude_from_own_dimension() {
        let mut mask = FilterMask::new(2);
        let sex = DimensionId(0);
        let rank = DimensionId(1);

        mask.set(RecordId(0), sex, true);
        assert!(!mask.passes_all(RecordId(0)));
        assert!(mask.passes_except(RecordId(0), sex));
        assert!(!mask.passes_except(RecordId(0), rank));
        assert!(mask.passes_all(RecordId(1)));
        assert_eq!(mask.count_passing(), 1);
    }

    #[test]
    fn set_reports_before_and_after() {
        let mut mask = FilterMask::new(1);
        let d = DimensionId(5);
        assert_eq!(mask.set(RecordId(0), d, true), (0, 1 << 5));
        assert_eq!(mask.set(RecordId(0), d, false), (1 << 5, 0));
        assert_eq!(mask.set(RecordId(9), d, true), (0, 0));
    }

    #[test]
    fn apply_delta() {
        let mut mask = FilterMask::new(3);
        let d = DimensionId(63);
        mask.apply(d, &FilterDelta { entered: vec![], exited: vec![RecordId(0), RecordId(2)] });
        assert_eq!(mask.count_passing(), 1);
        mask.apply(d, &FilterDelta { entered: vec![RecordId(2)], exited: vec![] });
        assert_eq!(mask.count_passing(), 2);
        assert_eq!(mask.bits(RecordId(0)), 1 << 63);
    }
}
