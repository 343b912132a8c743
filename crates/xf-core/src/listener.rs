//! Recompute notifications
//!
//! Every filter change runs to completion before listeners hear about it, so
//! a listener always reads a consistent view.

use crate::crossfilter::Crossfilter;
use serde::Serialize;
use xf_index::{DimensionId, Filter};

/// Summary of one completed filter change
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterEvent {
    /// Dimension whose filter changed
    pub dimension: DimensionId,
    /// Label of that dimension
    pub label: String,
    /// Filter now in place (`None` once cleared)
    pub filter: Option<Filter>,
    /// Records that started passing the dimension's filter
    pub entered: usize,
    /// Records that stopped passing it
    pub exited: usize,
    /// Generation reached by this change
    pub generation: u64,
}

impl FilterEvent {
    /// Records whose pass state on the dimension flipped
    #[inline]
    #[must_use]
    pub fn touched(&self) -> usize {
        self.entered + self.exited
    }

    /// Whether the change was a clear
    #[inline]
    #[must_use]
    pub fn is_clear(&self) -> bool {
        self.filter.is_none()
    }
}

/// Consumer redrawn after each recompute
pub trait RecomputeListener: Send {
    /// Called once per completed filter change
    fn on_recompute(&mut self, view: &Crossfilter, event: &FilterEvent);
}

impl<F> RecomputeListener for F
where
    F: FnMut(&Crossfilter, &FilterEvent) + Send,
{
    fn on_recompute(&mut self, view: &Crossfilter, event: &FilterEvent) {
        self(view, event);
    }
}
