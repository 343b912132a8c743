//! Filter coordinator
//!
//! [`Crossfilter`] owns the record store, every dimension, the per-record
//! filter masks and every group. Applying a filter walks only the records
//! whose pass state on that dimension flipped and replays them into the
//! groups whose active set they crossed.
//!
//! # Cross-filtering
//!
//! A record is active for a group on dimension `D` iff it passes every
//! filter except `D`'s own. Filtering `D` therefore never touches `D`'s
//! groups, while every other group and every whole-table group sees the
//! change.

use crate::error::{XfError, XfResult};
use crate::listener::{FilterEvent, RecomputeListener};
use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;
use xf_index::{Dimension, DimensionId, DimensionSpec, Filter, FilterMask, IndexError, MAX_DIMENSIONS};
use xf_record::{Key, Record, RecordId, RecordStore};
use xf_reduce::{Count, Group, GroupAll, Reducer};

/// Typed reference to a keyed group
pub struct GroupHandle<R> {
    index: usize,
    dimension: DimensionId,
    _reducer: PhantomData<fn() -> R>,
}

impl<R> GroupHandle<R> {
    /// Dimension the group is keyed by
    #[inline]
    #[must_use]
    pub fn dimension(&self) -> DimensionId {
        self.dimension
    }

    /// Slot of the group in its crossfilter
    #[inline]
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }
}

impl<R> Clone for GroupHandle<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for GroupHandle<R> {}

impl<R> PartialEq for GroupHandle<R> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.dimension == other.dimension
    }
}

impl<R> Eq for GroupHandle<R> {}

impl<R> fmt::Debug for GroupHandle<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupHandle")
            .field("index", &self.index)
            .field("dimension", &self.dimension)
            .finish()
    }
}

/// Typed reference to a whole-table group
pub struct GroupAllHandle<R> {
    index: usize,
    _reducer: PhantomData<fn() -> R>,
}

impl<R> GroupAllHandle<R> {
    /// Slot of the group in its crossfilter
    #[inline]
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }
}

impl<R> Clone for GroupAllHandle<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for GroupAllHandle<R> {}

impl<R> PartialEq for GroupAllHandle<R> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<R> Eq for GroupAllHandle<R> {}

impl<R> fmt::Debug for GroupAllHandle<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupAllHandle").field("index", &self.index).finish()
    }
}

/// Type-erased group for storage in the coordinator
trait GroupSlot: Send + Sync + fmt::Debug {
    /// Dimension the group is keyed by; `None` for whole-table groups
    fn dimension(&self) -> Option<DimensionId>;
    fn add(&mut self, key: &Key, record: &Record);
    fn remove(&mut self, key: &Key, record: &Record);
    fn reducer_name(&self) -> &'static str;
    fn as_any(&self) -> &dyn Any;
}

#[derive(Debug)]
struct KeyedSlot<R: Reducer> {
    dimension: DimensionId,
    group: Group<R>,
}

impl<R: Reducer> GroupSlot for KeyedSlot<R> {
    fn dimension(&self) -> Option<DimensionId> {
        Some(self.dimension)
    }

    fn add(&mut self, key: &Key, record: &Record) {
        self.group.add(key, record);
    }

    fn remove(&mut self, key: &Key, record: &Record) {
        self.group.remove(key, record);
    }

    fn reducer_name(&self) -> &'static str {
        self.group.reducer().name()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl<R: Reducer> GroupSlot for GroupAll<R> {
    fn dimension(&self) -> Option<DimensionId> {
        None
    }

    fn add(&mut self, _key: &Key, record: &Record) {
        GroupAll::add(self, record);
    }

    fn remove(&mut self, _key: &Key, record: &Record) {
        GroupAll::remove(self, record);
    }

    fn reducer_name(&self) -> &'static str {
        self.reducer().name()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Cross-filtered aggregation over one record store
pub struct Crossfilter {
    store: Arc<RecordStore>,
    dimensions: Vec<Dimension>,
    mask: FilterMask,
    groups: Vec<Box<dyn GroupSlot>>,
    listeners: Vec<Box<dyn RecomputeListener>>,
    generation: u64,
}

impl fmt::Debug for Crossfilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Crossfilter")
            .field("records", &self.store.len())
            .field("dimensions", &self.dimensions.len())
            .field("groups", &self.groups.len())
            .field("listeners", &self.listeners.len())
            .field("generation", &self.generation)
            .finish()
    }
}

impl Crossfilter {
    /// Create coordinator with no dimensions; every record passes
    #[must_use]
    pub fn new(store: Arc<RecordStore>) -> Self {
        let mask = FilterMask::new(store.len());
        Self {
            store,
            dimensions: Vec::new(),
            mask,
            groups: Vec::new(),
            listeners: Vec::new(),
            generation: 0,
        }
    }

    /// Add a dimension
    ///
    /// # Errors
    /// [`IndexError::DimensionLimit`] once every filter bit is taken.
    pub fn dimension(&mut self, spec: DimensionSpec) -> XfResult<DimensionId> {
        if self.dimensions.len() >= MAX_DIMENSIONS {
            return Err(IndexError::DimensionLimit.into());
        }
        let id = DimensionId(self.dimensions.len());
        let dimension = Dimension::new(id, &spec, &self.store);
        debug!(dimension = %id, label = %dimension.label(), "dimension added");
        self.dimensions.push(dimension);
        Ok(id)
    }

    /// Add a keyed group on a dimension
    ///
    /// Every distinct key of the dimension starts at `initial()`; records
    /// currently active for the dimension are folded in immediately.
    pub fn group<R: Reducer>(&mut self, dim: DimensionId, reducer: R) -> XfResult<GroupHandle<R>> {
        let dimension = self.dimension_ref(dim)?;
        let mut group = Group::new(reducer, dimension.distinct_keys());
        for (id, record) in self.store.iter() {
            if self.mask.passes_except(id, dim) {
                if let Some(key) = dimension.key(id) {
                    group.add(key, record);
                }
            }
        }

        let index = self.groups.len();
        self.groups.push(Box::new(KeyedSlot { dimension: dim, group }));
        debug!(group = index, dimension = %dim, "group added");
        Ok(GroupHandle {
            index,
            dimension: dim,
            _reducer: PhantomData,
        })
    }

    /// Add a record-counting group on a dimension
    pub fn count_group(&mut self, dim: DimensionId) -> XfResult<GroupHandle<Count>> {
        self.group(dim, Count)
    }

    /// Add a group over every record passing all filters
    pub fn group_all<R: Reducer>(&mut self, reducer: R) -> GroupAllHandle<R> {
        let mut group = GroupAll::new(reducer);
        for (id, record) in self.store.iter() {
            if self.mask.passes_all(id) {
                group.add(record);
            }
        }

        let index = self.groups.len();
        self.groups.push(Box::new(group));
        debug!(group = index, "whole-table group added");
        GroupAllHandle {
            index,
            _reducer: PhantomData,
        }
    }

    /// Read a keyed group
    pub fn get_group<R: Reducer>(&self, handle: GroupHandle<R>) -> XfResult<&Group<R>> {
        let slot = self.slot(handle.index)?;
        slot.as_any()
            .downcast_ref::<KeyedSlot<R>>()
            .map(|keyed| &keyed.group)
            .ok_or(XfError::GroupTypeMismatch {
                index: handle.index,
                expected: std::any::type_name::<R>(),
            })
    }

    /// Read a whole-table group
    pub fn get_group_all<R: Reducer>(&self, handle: GroupAllHandle<R>) -> XfResult<&GroupAll<R>> {
        let slot = self.slot(handle.index)?;
        slot.as_any()
            .downcast_ref::<GroupAll<R>>()
            .ok_or(XfError::GroupTypeMismatch {
                index: handle.index,
                expected: std::any::type_name::<R>(),
            })
    }

    /// Current value of a whole-table group
    pub fn group_all_value<R: Reducer>(&self, handle: GroupAllHandle<R>) -> XfResult<f64> {
        self.get_group_all(handle).map(GroupAll::value)
    }

    /// Replace a dimension's filter
    pub fn apply_filter(&mut self, dim: DimensionId, filter: Filter) -> XfResult<FilterEvent> {
        self.replace_filter(dim, Some(filter))
    }

    /// Remove a dimension's filter
    pub fn clear_filter(&mut self, dim: DimensionId) -> XfResult<FilterEvent> {
        self.replace_filter(dim, None)
    }

    /// Remove every filter, one event per dimension that had one
    ///
    /// All clears share one generation. Listeners run once every filter is
    /// gone, so none of them observes a partly cleared state.
    pub fn clear_all(&mut self) -> XfResult<Vec<FilterEvent>> {
        let filtered: Vec<DimensionId> = self
            .dimensions
            .iter()
            .filter(|d| d.filter().is_some())
            .map(Dimension::id)
            .collect();
        if filtered.is_empty() {
            return Ok(Vec::new());
        }

        let generation = self.generation + 1;
        let events = filtered
            .into_iter()
            .map(|dim| self.replay(dim, None, generation))
            .collect::<XfResult<Vec<_>>>()?;
        self.generation = generation;

        for event in &events {
            self.notify(event);
        }
        Ok(events)
    }

    fn replace_filter(&mut self, dim: DimensionId, filter: Option<Filter>) -> XfResult<FilterEvent> {
        let generation = self.generation + 1;
        let event = self.replay(dim, filter, generation)?;
        self.generation = generation;
        self.notify(&event);
        Ok(event)
    }

    /// Swap a dimension's filter and replay the crossing records into every
    /// affected group, without touching the generation or listeners
    fn replay(
        &mut self,
        dim: DimensionId,
        filter: Option<Filter>,
        generation: u64,
    ) -> XfResult<FilterEvent> {
        let dimension = self
            .dimensions
            .get_mut(dim.index())
            .ok_or(IndexError::UnknownDimension(dim))?;
        let delta = dimension.replace_filter(filter.clone());
        let label = dimension.label().to_string();

        let changes = delta
            .exited
            .iter()
            .map(|&id| (id, true))
            .chain(delta.entered.iter().map(|&id| (id, false)));

        let whole_table = Key::Missing;
        for (id, failing) in changes {
            let (before, after) = self.mask.set(id, dim, failing);
            if before == after {
                continue;
            }
            let Some(record) = self.store.get(id) else {
                continue;
            };

            for slot in &mut self.groups {
                let (was, now) = match slot.dimension() {
                    Some(own) if own == dim => continue,
                    Some(own) => (
                        FilterMask::clear_except(before, own),
                        FilterMask::clear_except(after, own),
                    ),
                    None => (before == 0, after == 0),
                };
                if was == now {
                    continue;
                }

                let key = match slot.dimension() {
                    Some(own) => self.dimensions.get(own.index()).and_then(|d| d.key(id)),
                    None => Some(&whole_table),
                };
                let Some(key) = key else {
                    continue;
                };
                if now {
                    slot.add(key, record);
                } else {
                    slot.remove(key, record);
                }
            }
        }

        let event = FilterEvent {
            dimension: dim,
            label,
            filter,
            entered: delta.entered.len(),
            exited: delta.exited.len(),
            generation,
        };
        debug!(
            dimension = %dim,
            label = %event.label,
            touched = event.touched(),
            generation = event.generation,
            cleared = event.is_clear(),
            "filter applied"
        );
        Ok(event)
    }

    fn notify(&mut self, event: &FilterEvent) {
        let mut listeners = std::mem::take(&mut self.listeners);
        for listener in &mut listeners {
            listener.on_recompute(self, event);
        }
        self.listeners = listeners;
    }

    /// Register a consumer of recompute events
    pub fn subscribe<L: RecomputeListener + 'static>(&mut self, listener: L) {
        self.listeners.push(Box::new(listener));
    }

    /// Up to `n` records with the smallest keys on a dimension, among
    /// records passing every filter
    pub fn bottom(&self, dim: DimensionId, n: usize) -> XfResult<Vec<RecordId>> {
        Ok(self.dimension_ref(dim)?.bottom(n, &self.mask))
    }

    /// Up to `n` records with the largest keys on a dimension, among
    /// records passing every filter
    pub fn top(&self, dim: DimensionId, n: usize) -> XfResult<Vec<RecordId>> {
        Ok(self.dimension_ref(dim)?.top(n, &self.mask))
    }

    /// Current filter of a dimension
    pub fn filter(&self, dim: DimensionId) -> XfResult<Option<&Filter>> {
        Ok(self.dimension_ref(dim)?.filter())
    }

    /// Whether a record is active for groups on a dimension
    pub fn is_active(&self, dim: DimensionId, record: RecordId) -> XfResult<bool> {
        self.dimension_ref(dim)?;
        Ok(self.mask.passes_except(record, dim))
    }

    /// Whether a record passes every filter
    #[inline]
    #[must_use]
    pub fn passes_all(&self, record: RecordId) -> bool {
        self.mask.passes_all(record)
    }

    /// Records passing every filter
    #[must_use]
    pub fn passing_count(&self) -> usize {
        self.mask.count_passing()
    }

    /// Dimension by id
    pub fn dimension_ref(&self, dim: DimensionId) -> XfResult<&Dimension> {
        self.dimensions
            .get(dim.index())
            .ok_or_else(|| IndexError::UnknownDimension(dim).into())
    }

    /// Reducer name of a group slot
    pub fn reducer_name(&self, index: usize) -> XfResult<&'static str> {
        self.slot(index).map(|slot| slot.reducer_name())
    }

    fn slot(&self, index: usize) -> XfResult<&dyn GroupSlot> {
        self.groups
            .get(index)
            .map(|slot| &**slot)
            .ok_or(XfError::UnknownGroup(index))
    }

    /// Completed filter calls so far; a `clear_all` counts once
    #[inline]
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Record store
    #[inline]
    #[must_use]
    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Number of dimensions
    #[inline]
    #[must_use]
    pub fn dimension_count(&self) -> usize {
        self.dimensions.len()
    }

    /// Number of groups of either kind
    #[inline]
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }
}
