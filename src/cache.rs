//! Memoises summaries per (user, month, year) until they are explicitly evicted.
//!
//! Entries never expire on their own.

use std::sync::Arc;

use dashmap::DashMap;

use crate::{models::UserID, period::Period, summary::Summary};

/// Identifies the one cached summary for a user and period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// The user the summary belongs to.
    pub user_id: UserID,
    /// The month the summary covers.
    pub period: Period,
}

impl CacheKey {
    /// Create a cache key.
    pub fn new(user_id: UserID, period: Period) -> Self {
        Self { user_id, period }
    }
}

/// A key's cached summary, if any, and how many times the key was evicted
/// while it was being tracked.
#[derive(Debug, Default)]
struct Slot {
    generation: u64,
    summary: Option<Arc<Summary>>,
}

/// A marker taken before computing a summary, used to detect evictions of
/// the same key that happen while the computation is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Generation(u64);

/// A concurrency-safe map from [CacheKey] to [Summary].
///
/// Only [SummaryCache::get], [SummaryCache::put] and [SummaryCache::evict] (plus
/// the generation-checked [SummaryCache::put_if_current]) are exposed. Every
/// operation on a key holds that key's entry lock, so concurrent puts are
/// last-writer-wins and an evict that follows a put always leaves the key absent.
#[derive(Debug, Default)]
pub struct SummaryCache {
    slots: DashMap<CacheKey, Slot>,
}

impl SummaryCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the summary stored under `key`, or `None` if there is none.
    pub fn get(&self, key: &CacheKey) -> Option<Arc<Summary>> {
        self.slots.get(key).and_then(|slot| slot.summary.clone())
    }

    /// Store `summary` under `key`, replacing any previous summary.
    pub fn put(&self, key: CacheKey, summary: Arc<Summary>) {
        self.slots.entry(key).or_default().summary = Some(summary);
    }

    /// The current generation of `key`.
    ///
    /// Take this before reading the data a summary is computed from and pass
    /// it to [SummaryCache::put_if_current]. From then on, evicting `key`
    /// advances its generation even if no summary is stored yet.
    pub fn generation(&self, key: &CacheKey) -> Generation {
        Generation(self.slots.entry(*key).or_default().generation)
    }

    /// Store `summary` under `key` unless `key` has been evicted since
    /// `generation` was taken.
    ///
    /// Returns whether the summary was stored.
    pub fn put_if_current(
        &self,
        key: CacheKey,
        summary: Arc<Summary>,
        generation: Generation,
    ) -> bool {
        let mut slot = self.slots.entry(key).or_default();

        if slot.generation != generation.0 {
            return false;
        }

        slot.summary = Some(summary);
        true
    }

    /// Remove the summary stored under `key`.
    ///
    /// Other keys are never affected. Returns whether a summary was removed.
    pub fn evict(&self, key: &CacheKey) -> bool {
        match self.slots.get_mut(key) {
            Some(mut slot) => {
                slot.generation = slot.generation.wrapping_add(1);
                slot.summary.take().is_some()
            }
            None => false,
        }
    }

    /// The number of cached summaries.
    pub fn len(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| slot.summary.is_some())
            .count()
    }

    /// Whether no summaries are cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
