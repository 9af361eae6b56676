// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Builder-style composition of decorator stacks.
//
// Every decorator takes its inner store by value, so a stack is built by
// wrapping from the base outwards. `StorageExt` makes that read left to
// right: `MemoryStore::new().transformed().observed(sink)` is an observing
// layer around a transforming layer around the base store.

use crate::backend::Storage;
use crate::metrics::MetricsStore;
use crate::observe::ObservingStore;
use crate::shared::SharedStore;
use crate::sink::Sink;
use crate::transform::TransformingStore;

/// Wrapping shorthands available on every store.
pub trait StorageExt: Storage {
    /// Wrap in an [`ObservingStore`] reporting to `sink`.
    fn observed<K>(self, sink: K) -> ObservingStore<Self, K>
    where
        K: Sink<Self::Ref, Self::Value, Self::ErrorRef>,
    {
        ObservingStore::new(self, sink)
    }

    /// Wrap in a [`TransformingStore`] with identity functions, ready for
    /// its `map_*` builder methods.
    fn transformed(self) -> TransformingStore<Self>
    where
        Self::Ref: Clone + 'static,
        Self::Value: 'static,
    {
        TransformingStore::new(self)
    }

    /// Wrap in a [`MetricsStore`].
    fn metered(self) -> MetricsStore<Self> {
        MetricsStore::new(self)
    }

    /// Move into a [`SharedStore`] cell.
    fn shared(self) -> SharedStore<Self> {
        SharedStore::new(self)
    }
}

impl<S: Storage> StorageExt for S {}
