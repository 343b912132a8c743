//! Testing utilities for the XF workspace
//!
//! Shared record fixtures, raw rows, and proptest strategies.

#![allow(missing_docs)]

use proptest::prelude::*;
use xf_record::{Measure, Rank, RawRecord, Record, RecordStore, Sex};

/// Record with the fields the reducers look at; the rest are fixed
pub fn record(sex: Sex, rank: Rank, salary: i64) -> Record {
    Record::new("A", sex, rank, salary, 10, 8)
}

pub fn record_full(
    discipline: &str,
    sex: Sex,
    rank: Rank,
    salary: i64,
    yrs_since_phd: i64,
    yrs_service: i64,
) -> Record {
    Record::new(discipline, sex, rank, salary, yrs_since_phd, yrs_service)
}

pub fn store(records: Vec<Record>) -> RecordStore {
    RecordStore::new(records).unwrap()
}

/// Twelve rows shaped like the salary dataset
pub fn sample_records() -> Vec<Record> {
    vec![
        record_full("B", Sex::Male, Rank::Prof, 139_750, 19, 18),
        record_full("B", Sex::Male, Rank::Prof, 173_200, 20, 16),
        record_full("B", Sex::Male, Rank::AsstProf, 79_750, 4, 3),
        record_full("B", Sex::Male, Rank::Prof, 115_000, 45, 39),
        record_full("B", Sex::Male, Rank::Prof, 141_500, 40, 41),
        record_full("B", Sex::Male, Rank::AssocProf, 97_000, 6, 6),
        record_full("A", Sex::Female, Rank::Prof, 105_000, 30, 23),
        record_full("A", Sex::Female, Rank::AsstProf, 73_000, 2, 0),
        record_full("A", Sex::Male, Rank::AssocProf, 86_100, 13, 12),
        record_full("A", Sex::Female, Rank::AssocProf, 77_500, 11, 8),
        record_full("B", Sex::Female, Rank::Prof, 122_960, 25, 19),
        record_full("A", Sex::Male, Rank::AsstProf, 80_225, 5, 3),
    ]
}

pub fn sample_store() -> RecordStore {
    store(sample_records())
}

/// Raw row as the bulk loader would deliver it
pub fn raw_row(
    discipline: &str,
    sex: &str,
    rank: &str,
    salary: &str,
    yrs_since_phd: &str,
    yrs_service: &str,
) -> RawRecord {
    let mut row = RawRecord::new();
    row.insert("rank".into(), rank.into());
    row.insert("discipline".into(), discipline.into());
    row.insert("yrs.since.phd".into(), yrs_since_phd.into());
    row.insert("yrs.service".into(), yrs_service.into());
    row.insert("sex".into(), sex.into());
    row.insert("salary".into(), salary.into());
    row
}

pub fn sample_rows() -> Vec<RawRecord> {
    sample_records()
        .iter()
        .map(|r| {
            raw_row(
                &r.discipline,
                r.sex.as_str(),
                r.rank.as_str(),
                &r.salary.to_string(),
                &r.yrs_since_phd.to_string(),
                &r.yrs_service.to_string(),
            )
        })
        .collect()
}

pub fn sex_strategy() -> impl Strategy<Value = Sex> {
    prop_oneof![Just(Sex::Female), Just(Sex::Male)]
}

pub fn rank_strategy() -> impl Strategy<Value = Rank> {
    prop_oneof![Just(Rank::Prof), Just(Rank::AssocProf), Just(Rank::AsstProf)]
}

/// Salary measure, occasionally non-numeric
pub fn measure_strategy() -> impl Strategy<Value = Measure> {
    prop_oneof![
        9 => (30_000i64..250_000).prop_map(Measure::Value),
        1 => Just(Measure::NonNumeric),
    ]
}

pub fn record_strategy() -> impl Strategy<Value = Record> {
    (
        prop_oneof![Just("A"), Just("B")],
        sex_strategy(),
        rank_strategy(),
        measure_strategy(),
        0i64..50,
        0i64..50,
    )
        .prop_map(|(discipline, sex, rank, salary, phd, service)| Record {
            salary,
            ..Record::new(discipline, sex, rank, 0, phd, service)
        })
}

pub fn records_strategy(max: usize) -> impl Strategy<Value = Vec<Record>> {
    prop::collection::vec(record_strategy(), 0..max)
}
