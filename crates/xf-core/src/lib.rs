//! XF Core
//!
//! The filter coordinator and the salary dashboard built on it.
//!
//! # Overview
//!
//! - **Crossfilter**: owns dimensions, filter masks and groups; applies
//!   filters incrementally and notifies listeners once each change completes
//! - **BulkLoader**: async acquisition of the full record set before indexing
//! - **SalaryDashboard**: the salary charts wired as explicit owned state
//! - **DashboardConfig**: TOML-loadable chart configuration
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use xf_core::Crossfilter;
//! use xf_index::{DimensionSpec, Filter};
//! use xf_record::{Field, Key, Rank, Record, RecordStore, Sex};
//!
//! let store = RecordStore::new(vec![
//!     Record::new("A", Sex::Male, Rank::Prof, 100, 10, 8),
//!     Record::new("B", Sex::Female, Rank::AsstProf, 90, 4, 3),
//! ])
//! .unwrap();
//!
//! let mut xf = Crossfilter::new(Arc::new(store));
//! let sex = xf.dimension(DimensionSpec::Field(Field::Sex)).unwrap();
//! let rank = xf.dimension(DimensionSpec::Field(Field::Rank)).unwrap();
//! let by_rank = xf.count_group(rank).unwrap();
//!
//! xf.apply_filter(sex, Filter::exact("Female")).unwrap();
//! let group = xf.get_group(by_rank).unwrap();
//! assert_eq!(group.value(&Key::from("Prof")), Some(0.0));
//! assert_eq!(group.value(&Key::from("AsstProf")), Some(1.0));
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod crossfilter;
pub mod dashboard;
pub mod error;
pub mod listener;
pub mod loader;

// Re-exports
pub use config::DashboardConfig;
pub use crossfilter::{Crossfilter, GroupAllHandle, GroupHandle};
pub use dashboard::{Chart, DashboardState, SalaryDashboard};
pub use error::{ConfigError, LoadError, XfError, XfResult};
pub use listener::{FilterEvent, RecomputeListener};
pub use loader::{load_store, BulkLoader, JsonFileLoader, MemoryLoader};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for dashboard operations
    pub use crate::{
        BulkLoader, Chart, Crossfilter, DashboardConfig, DashboardState, FilterEvent,
        GroupAllHandle, GroupHandle, JsonFileLoader, MemoryLoader, RecomputeListener,
        SalaryDashboard, XfError, XfResult,
    };
    pub use xf_index::{DimensionId, DimensionSpec, Filter};
    pub use xf_record::{Field, Key, Rank, Record, RecordStore, Sex};
    pub use xf_reduce::{ConditionalCount, ConditionalRatio, Count, Reducer, RunningAverage};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
