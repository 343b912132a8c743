//! Dashboard configuration
//!
//! Every field has a default matching the salary dashboard, so an empty
//! TOML document is a valid configuration.
//!
//! ```toml
//! percent_sexes = ["Female", "Male"]
//! senior_rank = "Prof"
//! stacked_ranks = ["AssocProf", "AsstProf", "Prof"]
//! average_field = "salary"
//! include_empty_points = false
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use xf_record::{Field, Rank, Sex};

/// Charts and series built by the dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// One percent-professor display per sex, in display order
    pub percent_sexes: Vec<Sex>,
    /// Rank counted by the percent-professor displays
    pub senior_rank: Rank,
    /// Rank-distribution series, bottom of the stack first
    pub stacked_ranks: Vec<Rank>,
    /// Numeric field averaged per sex
    pub average_field: Field,
    /// Keep scatter points whose group count fell to zero
    pub include_empty_points: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            percent_sexes: Sex::ALL.to_vec(),
            senior_rank: Rank::Prof,
            stacked_ranks: vec![Rank::AssocProf, Rank::AsstProf, Rank::Prof],
            average_field: Field::Salary,
            include_empty_points: false,
        }
    }
}

impl DashboardConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With percent-professor sexes
    #[must_use]
    pub fn with_percent_sexes(mut self, sexes: impl Into<Vec<Sex>>) -> Self {
        self.percent_sexes = sexes.into();
        self
    }

    /// With senior rank
    #[inline]
    #[must_use]
    pub fn with_senior_rank(mut self, rank: Rank) -> Self {
        self.senior_rank = rank;
        self
    }

    /// With stacked rank series
    #[must_use]
    pub fn with_stacked_ranks(mut self, ranks: impl Into<Vec<Rank>>) -> Self {
        self.stacked_ranks = ranks.into();
        self
    }

    /// With averaged field
    #[inline]
    #[must_use]
    pub fn with_average_field(mut self, field: Field) -> Self {
        self.average_field = field;
        self
    }

    /// With empty scatter points kept
    #[inline]
    #[must_use]
    pub fn with_empty_points(mut self, include: bool) -> Self {
        self.include_empty_points = include;
        self
    }

    /// Parse and validate TOML
    ///
    /// # Errors
    /// [`ConfigError::Parse`] for malformed TOML or unknown keys,
    /// [`ConfigError::Invalid`] when validation fails.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    ///
    /// # Errors
    /// [`ConfigError::Io`] when the file cannot be read, otherwise as
    /// [`DashboardConfig::from_toml_str`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Check the configuration can build a dashboard
    ///
    /// # Errors
    /// [`ConfigError::Invalid`] naming the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.average_field.is_numeric() {
            return Err(ConfigError::Invalid(format!(
                "average_field '{}' is not numeric",
                self.average_field
            )));
        }
        if self.stacked_ranks.is_empty() {
            return Err(ConfigError::Invalid("stacked_ranks is empty".into()));
        }
        if let Some(rank) = first_repeat(&self.stacked_ranks) {
            return Err(ConfigError::Invalid(format!("stacked_ranks repeats {rank}")));
        }
        if let Some(sex) = first_repeat(&self.percent_sexes) {
            return Err(ConfigError::Invalid(format!("percent_sexes repeats {sex}")));
        }
        Ok(())
    }
}

fn first_repeat<T: PartialEq>(items: &[T]) -> Option<&T> {
    items
        .iter()
        .enumerate()
        .find(|&(i, item)| items[..i].contains(item))
        .map(|(_, item)| item)
}
