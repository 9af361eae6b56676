// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Metrics-collecting decorator for KVStack stores.
//
// Wraps any `Storage` and counts operations, hits, misses and wall-clock
// latency. Unlike a shared-handle metrics layer, the counters live inside
// the store value itself and move forward with it: the stats reflect exactly
// the calls that produced the store you are holding.

use std::time::{Duration, Instant};

use crate::backend::{Fetched, Storage};

/// Accumulated statistics for a [`MetricsStore`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    /// Number of `fetch` operations performed.
    pub fetch_count: u64,
    /// Number of `get` operations performed.
    pub get_count: u64,
    /// Number of `put` operations performed.
    pub put_count: u64,
    /// Number of `delete` operations performed.
    pub delete_count: u64,
    /// Reads (`fetch` or `get`) that found a value.
    pub hits: u64,
    /// Reads (`fetch` or `get`) that found nothing.
    pub misses: u64,
    /// Cumulative latency of all reads.
    pub read_latency: Duration,
    /// Cumulative latency of all writes (`put` and `delete`).
    pub write_latency: Duration,
}

impl StoreStats {
    /// Total reads performed.
    pub fn reads(&self) -> u64 {
        self.fetch_count + self.get_count
    }

    /// Total writes performed.
    pub fn writes(&self) -> u64 {
        self.put_count + self.delete_count
    }

    /// Fraction of reads that found a value, or `None` before any read.
    pub fn hit_ratio(&self) -> Option<f64> {
        let reads = self.reads();
        (reads > 0).then(|| self.hits as f64 / reads as f64)
    }

    fn record_read(&mut self, hit: bool, elapsed: Duration) {
        if hit {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
        self.read_latency += elapsed;
    }
}

/// A store wrapper that collects operation metrics.
///
/// # Example
///
/// ```rust
/// use kvstack_storage::backend::Storage;
/// use kvstack_storage::memory::MemoryStore;
/// use kvstack_storage::metrics::MetricsStore;
///
/// let store = MetricsStore::new(MemoryStore::new()).put("key", "value");
/// let (store, _) = store.get(&"key");
/// let (store, _) = store.get(&"missing");
///
/// assert_eq!(store.stats().put_count, 1);
/// assert_eq!(store.stats().hits, 1);
/// assert_eq!(store.stats().misses, 1);
/// ```
#[derive(Debug, Clone)]
pub struct MetricsStore<S> {
    /// The wrapped store that performs the actual operations.
    inner: S,
    stats: StoreStats,
}

impl<S: Storage> MetricsStore<S> {
    /// Wrap `inner` with zeroed counters.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            stats: StoreStats::default(),
        }
    }
}

impl<S> MetricsStore<S> {
    /// Return the statistics carried by this store value.
    pub fn stats(&self) -> &StoreStats {
        &self.stats
    }

    /// Reset all statistics to zero.
    pub fn reset_stats(&mut self) {
        self.stats = StoreStats::default();
    }

    /// Return a reference to the inner store.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Unwrap, returning the inner store and discarding the counters.
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: Storage> Storage for MetricsStore<S> {
    type Ref = S::Ref;
    type Value = S::Value;
    type ErrorRef = S::ErrorRef;

    fn fetch(self, reference: &S::Ref) -> (Self, Fetched<S::Value, S::ErrorRef>) {
        let start = Instant::now();
        let (inner, result) = self.inner.fetch(reference);
        let mut stats = self.stats;
        stats.fetch_count += 1;
        stats.record_read(result.is_ok(), start.elapsed());
        (Self { inner, stats }, result)
    }

    fn get(self, reference: &S::Ref) -> (Self, Option<S::Value>) {
        let start = Instant::now();
        let (inner, value) = self.inner.get(reference);
        let mut stats = self.stats;
        stats.get_count += 1;
        stats.record_read(value.is_some(), start.elapsed());
        (Self { inner, stats }, value)
    }

    fn put(self, reference: S::Ref, value: S::Value) -> Self {
        let start = Instant::now();
        let inner = self.inner.put(reference, value);
        let mut stats = self.stats;
        stats.put_count += 1;
        stats.write_latency += start.elapsed();
        Self { inner, stats }
    }

    fn delete(self, reference: &S::Ref) -> Self {
        let start = Instant::now();
        let inner = self.inner.delete(reference);
        let mut stats = self.stats;
        stats.delete_count += 1;
        stats.write_latency += start.elapsed();
        Self { inner, stats }
    }
}
