//! XF Dimension Index
//!
//! Keyed projections over the record store and the filter state that
//! partitions records into active and excluded sets.
//!
//! # Overview
//!
//! - **Dimension**: per-record keys plus a sorted order for range queries
//! - **Filter**: the zero-or-one predicate a dimension holds
//! - **FilterMask**: one bit per dimension per record; a record is active in
//!   dimension `D` iff every bit except `D`'s is clear
//!
//! # Example
//!
//! ```rust
//! use xf_index::{Dimension, DimensionId, DimensionSpec, Filter, FilterMask};
//! use xf_record::{Field, Key, Rank, Record, RecordStore, Sex};
//!
//! let store = RecordStore::new(vec![
//!     Record::new("A", Sex::Female, Rank::Prof, 120_000, 20, 18),
//!     Record::new("B", Sex::Male, Rank::AsstProf, 80_000, 3, 2),
//! ])
//! .unwrap();
//!
//! let mut sex = Dimension::new(DimensionId(0), &DimensionSpec::Field(Field::Sex), &store);
//! let mut mask = FilterMask::new(store.len());
//!
//! let delta = sex.replace_filter(Some(Filter::Exact(Key::from("Female"))));
//! mask.apply(sex.id(), &delta);
//! assert_eq!(delta.exited.len(), 1);
//! assert!(mask.passes_except(delta.exited[0], sex.id()));
//! ```

#![warn(missing_docs)]

pub mod dimension;
pub mod error;
pub mod filter;
pub mod mask;

// Re-exports
pub use dimension::{Dimension, DimensionId, DimensionSpec, KeyFn};
pub use error::IndexError;
pub use filter::{Filter, FilterDelta};
pub use mask::{FilterMask, MAX_DIMENSIONS};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for index operations
    pub use crate::{
        Dimension, DimensionId, DimensionSpec, Filter, FilterDelta, FilterMask, IndexError,
        MAX_DIMENSIONS,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
