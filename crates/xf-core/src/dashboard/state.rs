//! Serializable read model
//!
//! What a renderer needs to redraw every chart after a recompute. Values
//! are read out of the groups at snapshot time.

use super::chart::Chart;
use serde::Serialize;
use xf_index::Filter;
use xf_record::{Measure, Rank, RecordId, Sex};

/// One bar of a series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesEntry {
    /// Bar label
    pub key: String,
    /// Bar height
    pub value: f64,
}

/// Percent-professor number display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PercentDisplay {
    /// Population the percentage is taken over
    pub sex: Sex,
    /// Share in `[0, 1]`
    pub value: f64,
    /// Share formatted with two decimals, e.g. `"50.00%"`
    pub display: String,
}

impl PercentDisplay {
    /// Display for a share
    #[must_use]
    pub fn new(sex: Sex, value: f64) -> Self {
        Self {
            sex,
            value,
            display: format_percent(value),
        }
    }
}

/// Share as a percentage with two decimals
#[must_use]
pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

/// One layer of the rank-distribution stack
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StackedSeries {
    /// Rank counted by the layer
    pub rank: Rank,
    /// Legend label
    pub label: String,
    /// Count per sex
    pub values: Vec<SeriesEntry>,
}

/// Inclusive axis range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AxisExtent {
    /// Smallest value
    pub min: i64,
    /// Largest value
    pub max: i64,
}

/// One scatter-plot point
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    /// Horizontal value
    pub x: Measure,
    /// Salary
    pub y: Measure,
    /// Record behind the point
    pub record: RecordId,
    /// Hover title, `"<rank> earned <salary>"`
    pub title: String,
    /// Colour key
    pub color: Sex,
    /// Group count of the point
    pub count: f64,
}

/// One scatter plot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterState {
    /// Horizontal axis label
    pub x_label: String,
    /// Vertical axis label
    pub y_label: String,
    /// Horizontal domain, captured when the dashboard was built
    pub extent: Option<AxisExtent>,
    /// Points, ascending by `(x, y, record)`
    pub points: Vec<ScatterPoint>,
}

/// Filter currently set on a chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActiveFilter {
    /// Filtered chart
    pub chart: Chart,
    /// Its filter
    pub filter: Filter,
}

/// Snapshot of every chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardState {
    /// Completed filter changes
    pub generation: u64,
    /// Records passing every filter
    pub passing: usize,
    /// Records loaded
    pub total: usize,
    /// Filters in place
    pub filters: Vec<ActiveFilter>,
    /// Record count per discipline
    pub discipline: Vec<SeriesEntry>,
    /// Percent-professor displays
    pub percent_professors: Vec<PercentDisplay>,
    /// Record count per sex
    pub gender_balance: Vec<SeriesEntry>,
    /// Average per sex
    pub average_salary: Vec<SeriesEntry>,
    /// Rank stack per sex
    pub rank_distribution: Vec<StackedSeries>,
    /// Years of service against salary
    pub service_salary: ScatterState,
    /// Years since PhD against salary
    pub phd_salary: ScatterState,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_formatting() {
        assert_eq!(format_percent(0.5), "50.00%");
        assert_eq!(format_percent(1.0), "100.00%");
        assert_eq!(format_percent(0.0), "0.00%");
        assert_eq!(format_percent(1.0 / 3.0), "33.33%");
        assert_eq!(PercentDisplay::new(Sex::Male, 0.125).display, "12.50%");
    }

    #[test]
    fn scatter_point_serializes_non_numeric_as_null() {
        let point = ScatterPoint {
            x: Measure::Value(3),
            y: Measure::NonNumeric,
            record: RecordId(7),
            title: "Prof earned NaN".into(),
            color: Sex::Female,
            count: 1.0,
        };
        let json = serde_json::to_value(&point).unwrap();
        assert_eq!(json["x"], 3);
        assert!(json["y"].is_null());
        assert_eq!(json["record"], 7);
        assert_eq!(json["color"], "Female");
    }
}
