//! Record predicates
//!
//! Reducers that count a subset of records take a [`Predicate`] instead of a
//! closure over a hard-coded value, so one reducer type covers every
//! conditional series and the predicate can be written in configuration.

use crate::record::{Rank, Record, Sex};
use serde::{Deserialize, Serialize};

/// Data-driven test over a record
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    /// Matches every record
    #[default]
    Always,
    /// Record has this sex
    Sex(Sex),
    /// Record has this rank
    Rank(Rank),
    /// Record belongs to this discipline
    Discipline(String),
    /// Every inner predicate matches (empty matches everything)
    All(Vec<Predicate>),
}

impl Predicate {
    /// Test a record
    #[must_use]
    pub fn matches(&self, record: &Record) -> bool {
        match self {
            Predicate::Always => true,
            Predicate::Sex(sex) => record.sex == *sex,
            Predicate::Rank(rank) => record.rank == *rank,
            Predicate::Discipline(d) => record.discipline == *d,
            Predicate::All(inner) => inner.iter().all(|p| p.matches(record)),
        }
    }

    /// Conjunction with another predicate
    #[must_use]
    pub fn and(self, other: Predicate) -> Predicate {
        match (self, other) {
            (Predicate::Always, p) | (p, Predicate::Always) => p,
            (Predicate::All(mut left), Predicate::All(right)) => {
                left.extend(right);
                Predicate::All(left)
            }
            (Predicate::All(mut left), p) => {
                left.push(p);
                Predicate::All(left)
            }
            (p, q) => Predicate::All(vec![p, q]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prof(sex: Sex) -> Record {
        Record::new("A", sex, Rank::Prof, 100, 10, 8)
    }

    #[test]
    fn single_field_predicates() {
        let r = prof(Sex::Female);
        assert!(Predicate::Sex(Sex::Female).matches(&r));
        assert!(!Predicate::Sex(Sex::Male).matches(&r));
        assert!(Predicate::Rank(Rank::Prof).matches(&r));
        assert!(Predicate::Discipline("A".into()).matches(&r));
        assert!(!Predicate::Discipline("B".into()).matches(&r));
    }

    #[test]
    fn conjunction() {
        let p = Predicate::Sex(Sex::Male).and(Predicate::Rank(Rank::Prof));
        assert!(p.matches(&prof(Sex::Male)));
        assert!(!p.matches(&prof(Sex::Female)));
        assert_eq!(Predicate::Always.and(Predicate::Rank(Rank::Prof)), Predicate::Rank(Rank::Prof));
        assert!(Predicate::All(vec![]).matches(&prof(Sex::Female)));
    }

    #[test]
    fn predicate_deserializes_from_config_text() {
        let p: Predicate = serde_json::from_str(r#"{"sex":"Female"}"#).unwrap();
        assert_eq!(p, Predicate::Sex(Sex::Female));
    }
}
