// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core storage contract for KVStack.
//
// Defines the `Storage` trait that every store, base or decorator, must
// satisfy. A store is a value: each operation consumes the current store and
// hands back its successor, so state changes made anywhere in a decorator
// chain are carried forward by the caller rather than mutated behind a shared
// handle. Four operations make up the contract (`fetch`, `get`, `put`,
// `delete`); the batch helpers are provided methods built on those four.

use crate::error::FetchError;

/// Outcome of [`Storage::fetch`]: the stored value, or the tagged absence.
pub type Fetched<V, R> = Result<V, FetchError<R>>;

/// A key-value store whose state is threaded through every call.
///
/// Implementations take `self` by value and return the next state. Callers
/// must keep the returned store and use it for the next call; discarding it
/// silently drops whatever the store (or any decorator inside it) recorded.
/// To keep an earlier state around, clone it before the call.
///
/// Absence is never a failure: `get` reports it as `None` and `fetch` as
/// [`FetchError::NoRef`].
pub trait Storage: Sized {
    /// Identifier used to address a value.
    type Ref;

    /// Payload associated with a reference. Stores never inspect it.
    type Value;

    /// Reference type carried by not-found errors.
    ///
    /// This is the reference type of the innermost store. Decorators pass
    /// errors through unchanged, so it does not follow reference mapping.
    type ErrorRef;

    /// Look up `reference`, returning the value or a tagged not-found error.
    fn fetch(self, reference: &Self::Ref) -> (Self, Fetched<Self::Value, Self::ErrorRef>);

    /// Look up `reference`, returning `None` when nothing is stored.
    ///
    /// Equivalent to [`Storage::fetch`] with the error collapsed to `None`.
    fn get(self, reference: &Self::Ref) -> (Self, Option<Self::Value>) {
        let (store, result) = self.fetch(reference);
        (store, result.ok())
    }

    /// Associate `value` with `reference`, replacing any previous value.
    fn put(self, reference: Self::Ref, value: Self::Value) -> Self;

    /// Remove any value stored under `reference`. Absent references are a no-op.
    fn delete(self, reference: &Self::Ref) -> Self;

    /// Put every entry in order, threading the store through each call.
    fn put_all<I>(self, entries: I) -> Self
    where
        I: IntoIterator<Item = (Self::Ref, Self::Value)>,
    {
        entries
            .into_iter()
            .fold(self, |store, (reference, value)| store.put(reference, value))
    }

    /// Get every reference in order.
    ///
    /// The returned vector has one slot per reference, `None` for misses.
    fn get_many<'r, I>(self, references: I) -> (Self, Vec<Option<Self::Value>>)
    where
        I: IntoIterator<Item = &'r Self::Ref>,
        Self::Ref: 'r,
    {
        let mut store = self;
        let mut values = Vec::new();
        for reference in references {
            let (next, value) = store.get(reference);
            store = next;
            values.push(value);
        }
        (store, values)
    }

    /// Delete every reference in order.
    fn delete_all<'r, I>(self, references: I) -> Self
    where
        I: IntoIterator<Item = &'r Self::Ref>,
        Self::Ref: 'r,
    {
        references
            .into_iter()
            .fold(self, |store, reference| store.delete(reference))
    }
}
