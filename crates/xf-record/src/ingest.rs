//! Ingestion of raw rows
//!
//! The bulk loader hands over flat string maps. Numeric fields are parsed
//! with the same leniency as a browser integer parse (`"42.9"` is 42,
//! `"12abc"` is 12); text without a leading integer becomes
//! [`Measure::NonNumeric`] and the record is kept.

use crate::record::{Field, Measure, Rank, Record, Sex};
use indexmap::IndexMap;

/// One raw row: field name to text, in source column order
pub type RawRecord = IndexMap<String, String>;

/// Errors while turning raw rows into records
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IngestError {
    /// Required column absent from a row
    #[error("row {row}: missing field '{field}'")]
    MissingField {
        /// Zero-based row index
        row: usize,
        /// Source column name
        field: &'static str,
    },

    /// `sex` holds a value outside the known categories
    #[error("row {row}: unknown sex '{value}'")]
    UnknownSex {
        /// Zero-based row index
        row: usize,
        /// Text found in the column
        value: String,
    },

    /// `rank` holds a value outside the known categories
    #[error("row {row}: unknown rank '{value}'")]
    UnknownRank {
        /// Zero-based row index
        row: usize,
        /// Text found in the column
        value: String,
    },

    /// More rows than a record id can address
    #[error("too many records: {count} exceeds the addressable maximum")]
    TooManyRecords {
        /// Rows supplied
        count: usize,
    },
}

impl IngestError {
    /// Row the error refers to, if any
    #[must_use]
    pub fn row(&self) -> Option<usize> {
        match self {
            IngestError::MissingField { row, .. }
            | IngestError::UnknownSex { row, .. }
            | IngestError::UnknownRank { row, .. } => Some(*row),
            IngestError::TooManyRecords { .. } => None,
        }
    }
}

impl Record {
    /// Build a record from a raw row
    ///
    /// `row` is only used for error reporting.
    ///
    /// # Errors
    /// Returns [`IngestError`] when a categorical field is missing or unknown.
    /// Numeric fields never fail; missing or unparsable text is non-numeric.
    pub fn from_raw(row: usize, raw: &RawRecord) -> Result<Self, IngestError> {
        let text = |field: Field| {
            raw.get(field.source_name())
                .map(String::as_str)
                .ok_or(IngestError::MissingField { row, field: field.source_name() })
        };

        let discipline = text(Field::Discipline)?.to_string();
        let sex = text(Field::Sex)?
            .parse::<Sex>()
            .map_err(|value| IngestError::UnknownSex { row, value })?;
        let rank = text(Field::Rank)?
            .parse::<Rank>()
            .map_err(|value| IngestError::UnknownRank { row, value })?;

        let measure = |field: Field| {
            let parsed = raw
                .get(field.source_name())
                .map_or(Measure::NonNumeric, |s| parse_leading_int(s));
            if !parsed.is_numeric() {
                tracing::warn!(row, field = field.source_name(), "non-numeric value kept as NaN");
            }
            parsed
        };

        Ok(Self {
            discipline,
            sex,
            rank,
            salary: measure(Field::Salary),
            yrs_since_phd: measure(Field::YrsSincePhd),
            yrs_service: measure(Field::YrsService),
        })
    }
}

/// Parse the leading integer of a string
///
/// Skips leading whitespace, accepts one sign and a `0x`/`0X` hex prefix,
/// then reads digits until the first character that is not one. No digits,
/// or a value that does not fit in `i64`, yields [`Measure::NonNumeric`].
#[must_use]
pub fn parse_leading_int(text: &str) -> Measure {
    let s = text.trim_start();
    let (negative, s) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let (radix, digits) = match s.get(..2) {
        Some("0x" | "0X") => (16, &s[2..]),
        _ => (10, s),
    };

    let end = digits
        .char_indices()
        .find(|(_, c)| !c.is_digit(radix))
        .map_or(digits.len(), |(i, _)| i);
    if end == 0 {
        return Measure::NonNumeric;
    }

    let parsed = if negative {
        i64::from_str_radix(&format!("-{}", &digits[..end]), radix)
    } else {
        i64::from_str_radix(&digits[..end], radix)
    };
    parsed.map_or(Measure::NonNumeric, Measure::Value)
}
