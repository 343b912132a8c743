//! Keyed and whole-table groups
//!
//! A [`Group`] seeds every key of its dimension with `initial()` when it is
//! built, so an accumulator is never read before it exists. The coordinator
//! then drives `add` / `remove` as records cross the group's active
//! boundary; nothing else mutates accumulator state.

use crate::reducer::Reducer;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use xf_record::{Key, Record};

/// One `(key, value)` pair read out of a group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupEntry {
    /// Group key
    pub key: Key,
    /// Reducer value for the key
    pub value: f64,
}

/// Accumulators keyed by dimension key
#[derive(Debug, Clone)]
pub struct Group<R: Reducer> {
    reducer: R,
    entries: BTreeMap<Key, R::Acc>,
}

impl<R: Reducer> Group<R> {
    /// Create group with an initial accumulator for every key
    #[must_use]
    pub fn new<I>(reducer: R, keys: I) -> Self
    where
        I: IntoIterator<Item = Key>,
    {
        let entries = keys
            .into_iter()
            .map(|key| (key, reducer.initial()))
            .collect();
        Self { reducer, entries }
    }

    /// Fold a record into its key
    pub fn add(&mut self, key: &Key, record: &Record) {
        if !self.entries.contains_key(key) {
            self.entries.insert(key.clone(), self.reducer.initial());
        }
        if let Some(acc) = self.entries.get_mut(key) {
            self.reducer.add(acc, record);
        }
    }

    /// Fold a record out of its key
    pub fn remove(&mut self, key: &Key, record: &Record) {
        debug_assert!(self.entries.contains_key(key), "removed a record from unknown key {key}");
        if let Some(acc) = self.entries.get_mut(key) {
            self.reducer.remove(acc, record);
        }
    }

    /// Accumulator of a key
    #[inline]
    #[must_use]
    pub fn get(&self, key: &Key) -> Option<&R::Acc> {
        self.entries.get(key)
    }

    /// Value of a key
    #[must_use]
    pub fn value(&self, key: &Key) -> Option<f64> {
        self.entries.get(key).map(|acc| self.reducer.value(acc))
    }

    /// Accumulators ascending by key
    pub fn entries(&self) -> impl Iterator<Item = (&Key, &R::Acc)> + '_ {
        self.entries.iter()
    }

    /// Every entry ascending by key
    #[must_use]
    pub fn all(&self) -> Vec<GroupEntry> {
        self.entries
            .iter()
            .map(|(key, acc)| GroupEntry {
                key: key.clone(),
                value: self.reducer.value(acc),
            })
            .collect()
    }

    /// Up to `n` entries with the largest values; ties ascending by key
    #[must_use]
    pub fn top(&self, n: usize) -> Vec<GroupEntry> {
        let mut all = self.all();
        all.sort_by(|a, b| b.value.total_cmp(&a.value).then_with(|| a.key.cmp(&b.key)));
        all.truncate(n);
        all
    }

    /// Reducer driving the group
    #[inline]
    #[must_use]
    pub fn reducer(&self) -> &R {
        &self.reducer
    }

    /// Number of keys
    #[inline]
    #[must_use]
    pub fn size(&self) -> usize {
        self.entries.len()
    }
}

/// Single accumulator over every record passing all filters
#[derive(Debug, Clone)]
pub struct GroupAll<R: Reducer> {
    reducer: R,
    acc: R::Acc,
}

impl<R: Reducer> GroupAll<R> {
    /// Create group holding `initial()`
    #[must_use]
    pub fn new(reducer: R) -> Self {
        let acc = reducer.initial();
        Self { reducer, acc }
    }

    /// Fold a record in
    pub fn add(&mut self, record: &Record) {
        self.reducer.add(&mut self.acc, record);
    }

    /// Fold a record out
    pub fn remove(&mut self, record: &Record) {
        self.reducer.remove(&mut self.acc, record);
    }

    /// Current accumulator
    #[inline]
    #[must_use]
    pub fn get(&self) -> &R::Acc {
        &self.acc
    }

    /// Current value
    #[must_use]
    pub fn value(&self) -> f64 {
        self.reducer.value(&self.acc)
    }

    /// Reducer driving the group
    #[inline]
    #[must_use]
    pub fn reducer(&self) -> &R {
        &self.reducer
    }
}
