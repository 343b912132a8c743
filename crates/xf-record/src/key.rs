//! Dimension keys
//!
//! A [`Key`] is what a dimension projects each record onto. Keys of one
//! dimension share a variant (apart from [`Key::Missing`]), so the derived
//! ordering is the natural ordering of the projected values.

use crate::record::{Measure, RecordId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered, hashable dimension key
///
/// Serializes untagged: `null`, a number, a string, or a point object.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Key {
    /// Numeric field that failed to parse
    Missing,
    /// Integer key
    Int(i64),
    /// Categorical key
    Text(String),
    /// Scatter plot coordinate, individually addressable by record
    Point(Point),
}

impl Key {
    /// Whether the key is [`Key::Missing`]
    #[inline]
    #[must_use]
    pub fn is_missing(&self) -> bool {
        matches!(self, Key::Missing)
    }

    /// Text of a categorical key
    #[inline]
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Key::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Integer value of a numeric key
    #[inline]
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Key::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Point payload of a scatter key
    #[inline]
    #[must_use]
    pub fn as_point(&self) -> Option<&Point> {
        match self {
            Key::Point(p) => Some(p),
            _ => None,
        }
    }
}

impl From<Measure> for Key {
    fn from(measure: Measure) -> Self {
        match measure {
            Measure::Value(v) => Key::Int(v),
            Measure::NonNumeric => Key::Missing,
        }
    }
}

impl From<i64> for Key {
    fn from(value: i64) -> Self {
        Key::Int(value)
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Key::Text(value.to_string())
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Key::Text(value)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Missing => f.write_str("NaN"),
            Key::Int(v) => write!(f, "{v}"),
            Key::Text(s) => f.write_str(s),
            Key::Point(p) => write!(f, "({}, {}) {}", p.x, p.y, p.record),
        }
    }
}

/// Composite scatter key
///
/// Carries the record id instead of the record so the consumer looks the
/// record up in the store. Field order makes points sort by `x`, then `y`,
/// then encounter order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate
    pub x: Measure,
    /// Vertical coordinate
    pub y: Measure,
    /// Record the point was projected from
    pub record: RecordId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_order_by_variant_then_value() {
        let mut keys = vec![
            Key::Text("b".into()),
            Key::Int(3),
            Key::Missing,
            Key::Int(-1),
            Key::Text("a".into()),
        ];
        keys.sort();
        assert_eq!(
            keys,
            vec![
                Key::Missing,
                Key::Int(-1),
                Key::Int(3),
                Key::Text("a".into()),
                Key::Text("b".into()),
            ]
        );
    }

    #[test]
    fn points_with_equal_coordinates_stay_distinct() {
        let a = Point { x: Measure::Value(5), y: Measure::Value(10), record: RecordId(0) };
        let b = Point { record: RecordId(1), ..a };
        assert_ne!(Key::Point(a), Key::Point(b));
        assert!(Key::Point(a) < Key::Point(b));
    }

    #[test]
    fn key_serializes_untagged() {
        assert_eq!(serde_json::to_string(&Key::Missing).unwrap(), "null");
        assert_eq!(serde_json::to_string(&Key::Int(4)).unwrap(), "4");
        assert_eq!(serde_json::to_string(&Key::from("Male")).unwrap(), "\"Male\"");
        let back: Key = serde_json::from_str("\"Female\"").unwrap();
        assert_eq!(back, Key::from("Female"));
    }
}
