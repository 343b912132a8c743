//! Bulk loading
//!
//! The record set is acquired once, asynchronously, before anything is
//! indexed. A loader either yields every row or fails; [`load_store`] turns
//! the rows into a [`RecordStore`] and rejects the whole set on the first
//! bad row.

use crate::error::LoadError;
use indexmap::IndexMap;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::info;
use xf_record::{RawRecord, RecordStore};

/// Source of raw rows
///
/// Implement this trait to read rows from a new kind of source.
#[async_trait::async_trait]
pub trait BulkLoader: Send + Sync {
    /// Deliver every row, or fail without delivering any
    async fn load(&self) -> Result<Vec<RawRecord>, LoadError>;

    /// Source name (for logging)
    fn source(&self) -> String;
}

/// Rows already in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    rows: Vec<RawRecord>,
}

impl MemoryLoader {
    /// Wrap rows
    #[inline]
    #[must_use]
    pub fn new(rows: Vec<RawRecord>) -> Self {
        Self { rows }
    }
}

#[async_trait::async_trait]
impl BulkLoader for MemoryLoader {
    async fn load(&self) -> Result<Vec<RawRecord>, LoadError> {
        Ok(self.rows.clone())
    }

    fn source(&self) -> String {
        format!("memory ({} rows)", self.rows.len())
    }
}

/// JSON file holding an array of flat objects
///
/// String values are taken as-is, `null` becomes an empty string and other
/// scalars are written out with their JSON text. Nested values are rejected.
#[derive(Debug, Clone)]
pub struct JsonFileLoader {
    path: PathBuf,
}

impl JsonFileLoader {
    /// Loader for a file path
    #[inline]
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// File being read
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse file content into rows
    ///
    /// # Errors
    /// [`LoadError::Decode`] for malformed JSON, [`LoadError::Source`] for
    /// nested values.
    pub fn parse(content: &str) -> Result<Vec<RawRecord>, LoadError> {
        let objects: Vec<IndexMap<String, Value>> = serde_json::from_str(content)?;

        objects
            .into_iter()
            .enumerate()
            .map(|(row, object)| {
                object
                    .into_iter()
                    .map(|(field, value)| {
                        let text = match value {
                            Value::String(s) => s,
                            Value::Null => String::new(),
                            Value::Bool(b) => b.to_string(),
                            Value::Number(n) => n.to_string(),
                            Value::Array(_) | Value::Object(_) => {
                                return Err(LoadError::Source(format!(
                                    "row {row}: field '{field}' is not a scalar"
                                )));
                            }
                        };
                        Ok((field, text))
                    })
                    .collect::<Result<RawRecord, LoadError>>()
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl BulkLoader for JsonFileLoader {
    async fn load(&self) -> Result<Vec<RawRecord>, LoadError> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| LoadError::io_error(&self.path, e))?;
        Self::parse(&content)
    }

    fn source(&self) -> String {
        self.path.display().to_string()
    }
}

/// Load every row and build the store
///
/// # Errors
/// Any loader failure, or the first row that cannot become a record.
pub async fn load_store(loader: &dyn BulkLoader) -> Result<RecordStore, LoadError> {
    let rows = loader.load().await?;
    let store = RecordStore::from_raw(rows)?;
    info!(source = %loader.source(), records = store.len(), "records loaded");
    Ok(store)
}
