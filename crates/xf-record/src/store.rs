//! Load-once record table
//!
//! [`RecordStore`] owns every record for the session. It is built once and
//! shared read-only afterwards; a record's [`RecordId`] is its position, so
//! ids follow encounter order.

use crate::ingest::{IngestError, RawRecord};
use crate::record::{Record, RecordId};

/// Read-only table of records
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordStore {
    records: Vec<Record>,
}

impl RecordStore {
    /// Wrap already-typed records
    ///
    /// # Errors
    /// Returns [`IngestError::TooManyRecords`] if ids would overflow.
    pub fn new(records: Vec<Record>) -> Result<Self, IngestError> {
        if u32::try_from(records.len()).is_err() {
            return Err(IngestError::TooManyRecords { count: records.len() });
        }
        Ok(Self { records })
    }

    /// Ingest raw rows, rejecting the whole batch on the first bad row
    ///
    /// # Errors
    /// Returns the first [`IngestError`] encountered.
    pub fn from_raw<I>(rows: I) -> Result<Self, IngestError>
    where
        I: IntoIterator<Item = RawRecord>,
    {
        let records = rows
            .into_iter()
            .enumerate()
            .map(|(row, raw)| Record::from_raw(row, &raw))
            .collect::<Result<Vec<_>, _>>()?;

        let store = Self::new(records)?;
        tracing::debug!(records = store.len(), "record store built");
        Ok(store)
    }

    /// Lookup a record
    #[inline]
    #[must_use]
    pub fn get(&self, id: RecordId) -> Option<&Record> {
        self.records.get(id.index())
    }

    /// Records with their ids, in encounter order
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (RecordId, &Record)> + '_ {
        self.records.iter().enumerate().map(|(i, r)| (Self::id_at(i), r))
    }

    /// Every id, in encounter order
    pub fn ids(&self) -> impl ExactSizeIterator<Item = RecordId> {
        (0..self.records.len()).map(Self::id_at)
    }

    /// All records as a slice indexed by [`RecordId::index`]
    #[inline]
    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Number of records
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the store is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    // `new` bounds the length, so every position fits.
    #[allow(clippy::cast_possible_truncation)]
    fn id_at(index: usize) -> RecordId {
        RecordId(index as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Rank, Sex};

    fn two() -> RecordStore {
        RecordStore::new(vec![
            Record::new("A", Sex::Female, Rank::Prof, 120_000, 20, 18),
            Record::new("B", Sex::Male, Rank::AsstProf, 80_000, 3, 2),
        ])
        .unwrap()
    }

    #[test]
    fn ids_follow_encounter_order() {
        let store = two();
        let ids: Vec<_> = store.ids().collect();
        assert_eq!(ids, vec![RecordId(0), RecordId(1)]);
        assert_eq!(store.get(RecordId(1)).unwrap().discipline, "B");
        assert!(store.get(RecordId(2)).is_none());
    }

    #[test]
    fn iter_pairs_ids_with_records() {
        let store = two();
        let (id, record) = store.iter().nth(1).unwrap();
        assert_eq!(id, RecordId(1));
        assert_eq!(record.sex, Sex::Male);
        assert_eq!(store.len(), 2);
        assert!(!store.is_empty());
    }

    #[test]
    fn from_raw_rejects_batch_on_bad_row() {
        let mut good = RawRecord::new();
        for (k, v) in [
            ("discipline", "A"),
            ("sex", "Female"),
            ("rank", "Prof"),
            ("salary", "1"),
            ("yrs.since.phd", "1"),
            ("yrs.service", "1"),
        ] {
            good.insert(k.into(), v.into());
        }
        let mut bad = good.clone();
        bad.insert("rank".into(), "Lecturer".into());

        let err = RecordStore::from_raw(vec![good.clone(), bad]).unwrap_err();
        assert_eq!(err, IngestError::UnknownRank { row: 1, value: "Lecturer".into() });
        assert_eq!(RecordStore::from_raw(vec![good]).unwrap().len(), 1);
    }
}
