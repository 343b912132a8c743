//! Record types
//!
//! One [`Record`] per employee observation. Categorical fields are typed
//! enums; numeric fields are [`Measure`]s so a value that failed to parse
//! travels with the record instead of dropping it.

use crate::key::Key;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stable record identifier: the record's position in the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub u32);

impl RecordId {
    /// Position of the record in the store
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Sex category
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Sex {
    /// "Female"
    Female,
    /// "Male"
    Male,
}

impl Sex {
    /// Every sex value, in key order
    pub const ALL: [Sex; 2] = [Sex::Female, Sex::Male];

    /// Source text of the value
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Sex::Female => "Female",
            Sex::Male => "Male",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sex {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Female" => Ok(Sex::Female),
            "Male" => Ok(Sex::Male),
            other => Err(other.to_string()),
        }
    }
}

/// Academic rank category
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rank {
    /// Full professor ("Prof")
    Prof,
    /// Associate professor ("AssocProf")
    AssocProf,
    /// Assistant professor ("AsstProf")
    AsstProf,
}

impl Rank {
    /// Every rank value
    pub const ALL: [Rank; 3] = [Rank::Prof, Rank::AssocProf, Rank::AsstProf];

    /// Source text of the value
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Rank::Prof => "Prof",
            Rank::AssocProf => "AssocProf",
            Rank::AsstProf => "AsstProf",
        }
    }

    /// Short label shown in the rank distribution legend
    #[must_use]
    pub fn legend_label(self) -> &'static str {
        match self {
            Rank::Prof => "Prof",
            Rank::AssocProf => "Assoc Prof",
            Rank::AsstProf => "Asst",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rank {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Prof" => Ok(Rank::Prof),
            "AssocProf" => Ok(Rank::AssocProf),
            "AsstProf" => Ok(Rank::AsstProf),
            other => Err(other.to_string()),
        }
    }
}

/// Integer measurement that may have failed to parse
///
/// `NonNumeric` orders before every value and serializes as `null`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "Option<i64>", into = "Option<i64>")]
pub enum Measure {
    /// Source text held no leading integer
    NonNumeric,
    /// Parsed value
    Value(i64),
}

impl Measure {
    /// Numeric value, if any
    #[inline]
    #[must_use]
    pub fn value(self) -> Option<i64> {
        match self {
            Measure::Value(v) => Some(v),
            Measure::NonNumeric => None,
        }
    }

    /// Whether the measure carries a value
    #[inline]
    #[must_use]
    pub fn is_numeric(self) -> bool {
        matches!(self, Measure::Value(_))
    }
}

impl From<Option<i64>> for Measure {
    fn from(value: Option<i64>) -> Self {
        value.map_or(Measure::NonNumeric, Measure::Value)
    }
}

impl From<Measure> for Option<i64> {
    fn from(measure: Measure) -> Self {
        measure.value()
    }
}

impl From<i64> for Measure {
    fn from(value: i64) -> Self {
        Measure::Value(value)
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Measure::Value(v) => write!(f, "{v}"),
            Measure::NonNumeric => f.write_str("NaN"),
        }
    }
}

/// One employee observation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Discipline category (free text)
    pub discipline: String,
    /// Sex category
    pub sex: Sex,
    /// Academic rank
    pub rank: Rank,
    /// Salary in currency units
    pub salary: Measure,
    /// Years since PhD
    pub yrs_since_phd: Measure,
    /// Years of service
    pub yrs_service: Measure,
}

impl Record {
    /// Create a record with numeric measures
    #[inline]
    #[must_use]
    pub fn new(
        discipline: impl Into<String>,
        sex: Sex,
        rank: Rank,
        salary: i64,
        yrs_since_phd: i64,
        yrs_service: i64,
    ) -> Self {
        Self {
            discipline: discipline.into(),
            sex,
            rank,
            salary: Measure::Value(salary),
            yrs_since_phd: Measure::Value(yrs_since_phd),
            yrs_service: Measure::Value(yrs_service),
        }
    }
}

/// Record field used to build dimension keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// `discipline`
    Discipline,
    /// `sex`
    Sex,
    /// `rank`
    Rank,
    /// `salary`
    Salary,
    /// `yrs.since.phd`
    YrsSincePhd,
    /// `yrs.service`
    YrsService,
}

impl Field {
    /// Field name as it appears in loaded rows
    #[must_use]
    pub fn source_name(self) -> &'static str {
        match self {
            Field::Discipline => "discipline",
            Field::Sex => "sex",
            Field::Rank => "rank",
            Field::Salary => "salary",
            Field::YrsSincePhd => "yrs.since.phd",
            Field::YrsService => "yrs.service",
        }
    }

    /// Whether the field holds a [`Measure`]
    #[inline]
    #[must_use]
    pub fn is_numeric(self) -> bool {
        matches!(self, Field::Salary | Field::YrsSincePhd | Field::YrsService)
    }

    /// Numeric value of the field; categorical fields are non-numeric
    #[must_use]
    pub fn measure(self, record: &Record) -> Measure {
        match self {
            Field::Salary => record.salary,
            Field::YrsSincePhd => record.yrs_since_phd,
            Field::YrsService => record.yrs_service,
            Field::Discipline | Field::Sex | Field::Rank => Measure::NonNumeric,
        }
    }

    /// Dimension key of the field for a record
    #[must_use]
    pub fn key(self, record: &Record) -> Key {
        match self {
            Field::Discipline => Key::Text(record.discipline.clone()),
            Field::Sex => Key::Text(record.sex.as_str().to_string()),
            Field::Rank => Key::Text(record.rank.as_str().to_string()),
            Field::Salary | Field::YrsSincePhd | Field::YrsService => {
                Key::from(self.measure(record))
            }
        }
    }

    /// Parse user-supplied text into a key of this field
    #[must_use]
    pub fn parse_key(self, text: &str) -> Key {
        if self.is_numeric() {
            Key::from(crate::ingest::parse_leading_int(text))
        } else {
            Key::Text(text.to_string())
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.source_name())
    }
}
