//! Chart names

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use xf_record::Field;

/// One chart of the salary dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Chart {
    /// Discipline selector
    Discipline,
    /// Record count per sex
    GenderBalance,
    /// Average of the configured field per sex
    AverageSalary,
    /// Stacked rank counts per sex
    RankDistribution,
    /// Years of service against salary
    ServiceSalary,
    /// Years since PhD against salary
    PhdSalary,
}

impl Chart {
    /// Every chart, in layout order
    pub const ALL: [Chart; 6] = [
        Chart::Discipline,
        Chart::GenderBalance,
        Chart::AverageSalary,
        Chart::RankDistribution,
        Chart::ServiceSalary,
        Chart::PhdSalary,
    ];

    /// Kebab-case name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Chart::Discipline => "discipline",
            Chart::GenderBalance => "gender-balance",
            Chart::AverageSalary => "average-salary",
            Chart::RankDistribution => "rank-distribution",
            Chart::ServiceSalary => "service-salary",
            Chart::PhdSalary => "phd-salary",
        }
    }

    /// Whether selecting a value on the chart filters the others
    ///
    /// Scatter plots have no brush.
    #[inline]
    #[must_use]
    pub fn is_selectable(self) -> bool {
        !self.is_scatter()
    }

    /// Whether the chart is a scatter plot
    #[inline]
    #[must_use]
    pub fn is_scatter(self) -> bool {
        matches!(self, Chart::ServiceSalary | Chart::PhdSalary)
    }

    /// Field selected values are parsed as
    #[must_use]
    pub fn key_field(self) -> Field {
        match self {
            Chart::Discipline => Field::Discipline,
            Chart::GenderBalance | Chart::AverageSalary | Chart::RankDistribution => Field::Sex,
            Chart::ServiceSalary => Field::YrsService,
            Chart::PhdSalary => Field::YrsSincePhd,
        }
    }
}

impl fmt::Display for Chart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Chart {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Chart::ALL
            .into_iter()
            .find(|chart| chart.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}
