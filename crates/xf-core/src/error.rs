//! Error types for XF Core
//!
//! Provides error handling for:
//! - Bulk load failures (nothing is built from partial data)
//! - Configuration parsing and validation
//! - Dimension and group handle misuse

use std::path::PathBuf;
use xf_index::IndexError;
use xf_record::IngestError;

/// Errors while acquiring the record set
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// IO error reading the source
    #[error("io error reading {path}: {source}")]
    Io {
        /// File the loader tried to read
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Source content is not a list of flat rows
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// A row could not become a record
    #[error("ingest error: {0}")]
    Ingest(#[from] IngestError),

    /// Loader-specific failure
    #[error("source error: {0}")]
    Source(String),
}

impl LoadError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors in dashboard configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading the config file
    #[error("io error reading {path}: {source}")]
    Io {
        /// Config file path
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Malformed TOML
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Well-formed but unusable values
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Main XF error type
#[derive(Debug, thiserror::Error)]
pub enum XfError {
    /// Loading failed before any record reached the engine
    #[error("load failed: {0}")]
    Load(#[from] LoadError),

    /// Dimension management failed
    #[error("index error: {0}")]
    Index(#[from] IndexError),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Handle does not name a group of this crossfilter
    #[error("unknown group: {0}")]
    UnknownGroup(usize),

    /// Handle's reducer type differs from the stored group's
    #[error("group {index} is not a {expected} group")]
    GroupTypeMismatch {
        /// Group slot the handle points at
        index: usize,
        /// Reducer type the handle expected
        expected: &'static str,
    },

    /// Chart does not accept selections
    #[error("chart '{0}' is not selectable")]
    NotSelectable(String),
}

impl XfError {
    /// Whether the error came from the data source rather than from usage
    #[inline]
    #[must_use]
    pub fn is_load_failure(&self) -> bool {
        matches!(self, XfError::Load(_))
    }
}

/// Result type alias for XF operations
pub type XfResult<T> = Result<T, XfError>;
