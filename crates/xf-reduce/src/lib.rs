//! XF Reducers
//!
//! Incremental aggregation for cross-filtered groups.
//!
//! # Overview
//!
//! A [`Reducer`] is the `initial` / `add` / `remove` triple that keeps one
//! accumulator in step with a changing set of records, plus the value
//! accessor read at render time. Every reducer here obeys three laws:
//!
//! - **Reversible**: `remove(add(a, r), r) == a`
//! - **Order independent**: the accumulator depends only on the surviving
//!   multiset of records
//! - **Zero reset**: an empty count yields a value of `0.0`, never NaN
//!
//! [`Group`] keeps one accumulator per dimension key; [`GroupAll`] keeps a
//! single accumulator over every record that passes all filters.
//!
//! # Example
//!
//! ```rust
//! use xf_reduce::{ConditionalRatio, GroupAll, Reducer};
//! use xf_record::{Rank, Record, Sex};
//!
//! let mut share = GroupAll::new(ConditionalRatio::share_of_rank(Sex::Male, Rank::Prof));
//! share.add(&Record::new("A", Sex::Male, Rank::Prof, 100, 10, 5));
//! share.add(&Record::new("A", Sex::Male, Rank::AsstProf, 60, 2, 1));
//! assert_eq!(share.value(), 0.5);
//! ```

#![warn(missing_docs)]

pub mod average;
pub mod conditional;
pub mod group;
pub mod reducer;

// Re-exports
pub use average::{AverageAcc, RunningAverage};
pub use conditional::{ConditionalCount, ConditionalRatio, RatioAcc};
pub use group::{Group, GroupAll, GroupEntry};
pub use reducer::{Count, Reducer};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for reducer operations
    pub use crate::{
        AverageAcc, ConditionalCount, ConditionalRatio, Count, Group, GroupAll, GroupEntry,
        RatioAcc, Reducer, RunningAverage,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
