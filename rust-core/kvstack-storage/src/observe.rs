// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Observing decorator for KVStack stores.
//
// Wraps any `Storage` and reports every completed operation to a `Sink`.
// The inner store does the work; the decorator captures what it returned,
// emits exactly one record afterwards, and hands back the inner result
// untouched with the inner store's successor rewrapped.

use crate::backend::{Fetched, Storage};
use crate::sink::{LogRecord, Sink};

/// A store wrapper that records every operation through a sink.
///
/// Records describe values at this layer: placed outside a transforming
/// store they show caller-side values, placed inside one they show what
/// the transformation produced.
///
/// # Example
///
/// ```rust
/// use kvstack_storage::backend::Storage;
/// use kvstack_storage::memory::MemoryStore;
/// use kvstack_storage::observe::ObservingStore;
/// use kvstack_storage::sink::{CollectingSink, LogRecord};
///
/// let sink = CollectingSink::new();
/// let store = ObservingStore::new(MemoryStore::new(), sink.clone());
///
/// let store = store.put("k", 1);
/// let (_store, value) = store.get(&"k");
/// assert_eq!(value, Some(1));
///
/// assert_eq!(
///     sink.records(),
///     vec![
///         LogRecord::Put { reference: "k", value: 1 },
///         LogRecord::Get { reference: "k", value: Some(1) },
///     ]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct ObservingStore<S, K> {
    /// The wrapped store that performs the actual operations.
    inner: S,
    /// Where records go.
    sink: K,
}

impl<S, K> ObservingStore<S, K>
where
    S: Storage,
    K: Sink<S::Ref, S::Value, S::ErrorRef>,
{
    /// Wrap `inner`, sending one record per operation to `sink`.
    pub fn new(inner: S, sink: K) -> Self {
        Self { inner, sink }
    }
}

impl<S, K> ObservingStore<S, K> {
    /// Return a reference to the inner store.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Return a reference to the sink.
    pub fn sink(&self) -> &K {
        &self.sink
    }

    /// Unwrap, returning the inner store and discarding the sink.
    pub fn into_inner(self) -> S {
        self.inner
    }

    /// Unwrap into the inner store and the sink.
    pub fn into_parts(self) -> (S, K) {
        (self.inner, self.sink)
    }
}

impl<S, K> Storage for ObservingStore<S, K>
where
    S: Storage,
    S::Ref: Clone,
    S::Value: Clone,
    S::ErrorRef: Clone,
    K: Sink<S::Ref, S::Value, S::ErrorRef>,
{
    type Ref = S::Ref;
    type Value = S::Value;
    type ErrorRef = S::ErrorRef;

    fn fetch(self, reference: &S::Ref) -> (Self, Fetched<S::Value, S::ErrorRef>) {
        let (inner, result) = self.inner.fetch(reference);
        self.sink.accept(LogRecord::Fetch {
            reference: reference.clone(),
            result: result.clone(),
        });
        (Self { inner, sink: self.sink }, result)
    }

    fn get(self, reference: &S::Ref) -> (Self, Option<S::Value>) {
        let (inner, value) = self.inner.get(reference);
        self.sink.accept(LogRecord::Get {
            reference: reference.clone(),
            value: value.clone(),
        });
        (Self { inner, sink: self.sink }, value)
    }

    fn put(self, reference: S::Ref, value: S::Value) -> Self {
        let inner = self.inner.put(reference.clone(), value.clone());
        self.sink.accept(LogRecord::Put { reference, value });
        Self { inner, sink: self.sink }
    }

    fn delete(self, reference: &S::Ref) -> Self {
        let inner = self.inner.delete(reference);
        self.sink.accept(LogRecord::Delete {
            reference: reference.clone(),
        });
        Self { inner, sink: self.sink }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::memory::MemoryStore;
    use crate::sink::{CollectingSink, Operation};
    use std::cell::Cell;
    use std::panic;

    fn observed() -> (
        ObservingStore<MemoryStore<&'static str, u32>, CollectingSink<&'static str, u32>>,
        CollectingSink<&'static str, u32>,
    ) {
        let sink = CollectingSink::new();
        (ObservingStore::new(MemoryStore::new(), sink.clone()), sink)
    }

    #[test]
    fn test_one_record_per_operation() {
        let (store, sink) = observed();

        let store = store.put("a", 1);
        let (store, _) = store.fetch(&"a");
        let (store, _) = store.get(&"a");
        let _store = store.delete(&"a");

        let ops: Vec<Operation> = sink.records().iter().map(|r| r.operation()).collect();
        assert_eq!(
            ops,
            vec![Operation::Put, Operation::Fetch, Operation::Get, Operation::Delete]
        );
    }

    #[test]
    fn test_record_fields_match_results() {
        let (store, sink) = observed();

        let store = store.put("a", 7);
        let (store, hit) = store.fetch(&"a");
        let (store, miss) = store.fetch(&"b");
        let (store, absent) = store.get(&"b");
        let _store = store.delete(&"b");

        assert_eq!(hit, Ok(7));
        assert_eq!(miss, Err(FetchError::NoRef("b")));
        assert_eq!(absent, None);

        assert_eq!(
            sink.records(),
            vec![
                LogRecord::Put { reference: "a", value: 7 },
                LogRecord::Fetch { reference: "a", result: Ok(7) },
                LogRecord::Fetch {
                    reference: "b",
                    result: Err(FetchError::NoRef("b")),
                },
                LogRecord::Get { reference: "b", value: None },
                LogRecord::Delete { reference: "b" },
            ]
        );
    }

    #[test]
    fn test_results_and_state_unchanged_by_observation() {
        let (observed_store, _sink) = observed();
        let plain: MemoryStore<&str, u32> = MemoryStore::new();

        let observed_store = observed_store.put("x", 1).put("y", 2).delete(&"x");
        let plain = plain.put("x", 1).put("y", 2).delete(&"x");

        assert_eq!(observed_store.inner(), &plain);
    }

    #[test]
    fn test_batch_helpers_record_each_element() {
        let (store, sink) = observed();

        let store = store.put_all(vec![("a", 1), ("b", 2)]);
        let (store, values) = store.get_many(&["a", "z"]);
        let _store = store.delete_all(&["a", "b"]);

        assert_eq!(values, vec![Some(1), None]);
        assert_eq!(sink.len(), 6);
    }

    #[test]
    fn test_closure_sink_sees_post_hoc_value() {
        let last_put = Cell::new(None);
        let sink = |record: LogRecord<&'static str, u32>| {
            if let LogRecord::Put { value, .. } = record {
                last_put.set(Some(value));
            }
        };

        let store = ObservingStore::new(MemoryStore::new(), sink);
        let store = store.put("k", 41).put("k", 42);

        assert_eq!(last_put.get(), Some(42));
        let (base, _sink) = store.into_parts();
        assert!(base.contains(&"k"));
    }

    #[test]
    fn test_panicking_sink_reaches_caller() {
        let outcome = panic::catch_unwind(|| {
            let sink = |record: LogRecord<&'static str, u32>| {
                if record.operation() == Operation::Delete {
                    panic!("sink rejected {:?}", record.reference());
                }
            };
            ObservingStore::new(MemoryStore::new(), sink)
                .put("k", 1)
                .delete(&"k")
        });
        assert!(outcome.is_err());

        let quiet = panic::catch_unwind(|| {
            let sink = |_: LogRecord<&'static str, u32>| {};
            ObservingStore::new(MemoryStore::new(), sink).put("k", 1).into_inner()
        });
        assert!(quiet.map(|base| base.contains(&"k")).unwrap_or(false));
    }
}
