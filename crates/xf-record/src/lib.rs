//! XF Record Store
//!
//! Typed employee records and the load-once table that owns them.
//!
//! # Overview
//!
//! - **Record**: one immutable salary observation
//! - **RecordStore**: the read-only table, addressed by [`RecordId`]
//! - **Key**: ordered dimension key, including the scatter [`Point`] key
//! - **Predicate**: data-driven record predicate used by reducers
//!
//! # Example
//!
//! ```rust
//! use xf_record::{RawRecord, RecordStore, Sex};
//!
//! let mut row = RawRecord::new();
//! row.insert("discipline".into(), "A".into());
//! row.insert("sex".into(), "Female".into());
//! row.insert("rank".into(), "Prof".into());
//! row.insert("salary".into(), "101000".into());
//! row.insert("yrs.since.phd".into(), "20".into());
//! row.insert("yrs.service".into(), "18".into());
//!
//! let store = RecordStore::from_raw(vec![row]).unwrap();
//! assert_eq!(store.len(), 1);
//! assert_eq!(store.iter().next().unwrap().1.sex, Sex::Female);
//! ```

#![warn(missing_docs)]

pub mod ingest;
pub mod key;
pub mod predicate;
pub mod record;
pub mod store;

// Re-exports
pub use ingest::{parse_leading_int, IngestError, RawRecord};
pub use key::{Key, Point};
pub use predicate::Predicate;
pub use record::{Field, Measure, Rank, Record, RecordId, Sex};
pub use store::RecordStore;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for record operations
    pub use crate::{
        Field, IngestError, Key, Measure, Point, Predicate, Rank, RawRecord, Record, RecordId,
        RecordStore, Sex,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
