// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Transforming decorator for KVStack stores.
//
// Wraps any `Storage` with three independent functions: one applied to
// references before they reach the inner store, one applied to values on
// their way in, and one applied to values on their way out. Each starts as
// the identity function and can be replaced individually. A common use is
// namespacing, which lets several logical stores share one physical store
// without key collisions.

use std::fmt;
use std::sync::Arc;

use crate::backend::{Fetched, Storage};

type RefMap<R, T> = Arc<dyn Fn(&R) -> T + Send + Sync>;
type ValueMap<A, B> = Arc<dyn Fn(A) -> B + Send + Sync>;

/// A store wrapper that rewrites references and values around an inner store.
///
/// `R` and `V` are the reference and value types seen by callers; they
/// default to the inner store's own types. The functions are:
///
/// - `map_ref`: caller reference to inner reference, used by every operation.
/// - `map_to_store`: caller value to inner value, used by `put`.
/// - `map_from_store`: inner value to caller value, used by `fetch` and `get`.
///
/// The two value functions need not be inverses and no round-trip check is
/// made. Not-found errors from the inner store pass through unchanged, so
/// they carry the mapped reference.
///
/// Cloning shares the functions and clones the inner store, so a clone
/// taken before an operation keeps describing the earlier state.
///
/// # Example
///
/// ```rust
/// use kvstack_storage::backend::Storage;
/// use kvstack_storage::memory::MemoryStore;
/// use kvstack_storage::transform::TransformingStore;
///
/// let store = TransformingStore::new(MemoryStore::new())
///     .map_to_store(|v: i64| v + 1);
///
/// let store = store.put("one", 1);
/// let (_store, value) = store.get(&"one");
/// assert_eq!(value, Some(2));
/// ```
pub struct TransformingStore<S, R = <S as Storage>::Ref, V = <S as Storage>::Value>
where
    S: Storage,
{
    /// The wrapped store that holds the transformed entries.
    inner: S,
    map_ref: RefMap<R, S::Ref>,
    map_to_store: ValueMap<V, S::Value>,
    map_from_store: ValueMap<S::Value, V>,
}

impl<S> TransformingStore<S>
where
    S: Storage,
    S::Ref: Clone + 'static,
    S::Value: 'static,
{
    /// Wrap `inner` with identity functions in all three positions.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            map_ref: Arc::new(|reference: &S::Ref| reference.clone()),
            map_to_store: Arc::new(|value: S::Value| value),
            map_from_store: Arc::new(|value: S::Value| value),
        }
    }
}

impl<S> TransformingStore<S, String, S::Value>
where
    S: Storage<Ref = String>,
    S::Value: 'static,
{
    /// Wrap a string-keyed store so every reference `k` is stored as
    /// `"{namespace}:{k}"`.
    pub fn namespaced(inner: S, namespace: &str) -> Self {
        let prefix = format!("{namespace}:");
        Self {
            inner,
            map_ref: Arc::new(move |reference: &String| format!("{prefix}{reference}")),
            map_to_store: Arc::new(|value: S::Value| value),
            map_from_store: Arc::new(|value: S::Value| value),
        }
    }
}

impl<S, R, V> TransformingStore<S, R, V>
where
    S: Storage,
{
    /// Wrap `inner` with all three functions supplied.
    pub fn with_functions<FR, FT, FF>(
        inner: S,
        map_ref: FR,
        map_to_store: FT,
        map_from_store: FF,
    ) -> Self
    where
        FR: Fn(&R) -> S::Ref + Send + Sync + 'static,
        FT: Fn(V) -> S::Value + Send + Sync + 'static,
        FF: Fn(S::Value) -> V + Send + Sync + 'static,
    {
        Self {
            inner,
            map_ref: Arc::new(map_ref),
            map_to_store: Arc::new(map_to_store),
            map_from_store: Arc::new(map_from_store),
        }
    }

    /// Replace the reference function. The caller-side reference type
    /// becomes whatever `f` accepts.
    pub fn map_ref<R2, F>(self, f: F) -> TransformingStore<S, R2, V>
    where
        F: Fn(&R2) -> S::Ref + Send + Sync + 'static,
    {
        TransformingStore {
            inner: self.inner,
            map_ref: Arc::new(f),
            map_to_store: self.map_to_store,
            map_from_store: self.map_from_store,
        }
    }

    /// Replace the function applied to values before they are stored.
    pub fn map_to_store<F>(self, f: F) -> Self
    where
        F: Fn(V) -> S::Value + Send + Sync + 'static,
    {
        Self {
            map_to_store: Arc::new(f),
            ..self
        }
    }

    /// Replace the function applied to values after they are retrieved.
    pub fn map_from_store<F>(self, f: F) -> Self
    where
        F: Fn(S::Value) -> V + Send + Sync + 'static,
    {
        Self {
            map_from_store: Arc::new(f),
            ..self
        }
    }

    /// Replace both value functions, changing the caller-side value type.
    pub fn map_values<V2, FT, FF>(self, to_store: FT, from_store: FF) -> TransformingStore<S, R, V2>
    where
        FT: Fn(V2) -> S::Value + Send + Sync + 'static,
        FF: Fn(S::Value) -> V2 + Send + Sync + 'static,
    {
        TransformingStore {
            inner: self.inner,
            map_ref: self.map_ref,
            map_to_store: Arc::new(to_store),
            map_from_store: Arc::new(from_store),
        }
    }

    /// Return a reference to the inner store.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Unwrap, returning the inner store and discarding the functions.
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S, R, V> Clone for TransformingStore<S, R, V>
where
    S: Storage + Clone,
{
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            map_ref: Arc::clone(&self.map_ref),
            map_to_store: Arc::clone(&self.map_to_store),
            map_from_store: Arc::clone(&self.map_from_store),
        }
    }
}

impl<S, R, V> fmt::Debug for TransformingStore<S, R, V>
where
    S: Storage + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformingStore")
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}

impl<S, R, V> Storage for TransformingStore<S, R, V>
where
    S: Storage,
{
    type Ref = R;
    type Value = V;
    type ErrorRef = S::ErrorRef;

    fn fetch(self, reference: &R) -> (Self, Fetched<V, S::ErrorRef>) {
        let (inner, result) = self.inner.fetch(&(self.map_ref)(reference));
        let result = result.map(|value| (self.map_from_store)(value));
        (Self { inner, ..self }, result)
    }

    fn get(self, reference: &R) -> (Self, Option<V>) {
        let (inner, value) = self.inner.get(&(self.map_ref)(reference));
        let value = value.map(|value| (self.map_from_store)(value));
        (Self { inner, ..self }, value)
    }

    fn put(self, reference: R, value: V) -> Self {
        let inner = self
            .inner
            .put((self.map_ref)(&reference), (self.map_to_store)(value));
        Self { inner, ..self }
    }

    fn delete(self, reference: &R) -> Self {
        let inner = self.inner.delete(&(self.map_ref)(reference));
        Self { inner, ..self }
    }
}
