// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// KVStack Storage
//
// A single key-value storage contract plus decorator stores that stack on
// top of any store implementing it. A store is a value: every operation
// consumes it and returns its successor, so decorators can carry state of
// their own without locks, and the caller always holds the whole chain.
//
// # Modules
//
// - [`backend`] -- The `Storage` trait: `fetch`, `get`, `put`, `delete`.
// - [`error`] -- `FetchError` (tagged absence) and `StorageError`.
// - [`memory`] -- A `HashMap`-based base store.
// - [`observe`] -- A decorator reporting every operation to a sink.
// - [`sink`] -- Log records and the tracing, collecting and JSON-lines sinks.
// - [`transform`] -- A decorator mapping references and values.
// - [`metrics`] -- A decorator counting operations inside the store value.
// - [`shared`] -- An async mutex cell for sharing one store between tasks.
// - [`compose`] -- `StorageExt` shorthands for building stacks.
//
// # Example
//
// ```rust
// use kvstack_storage::{CollectingSink, MemoryStore, Storage, StorageExt};
//
// let sink = CollectingSink::new();
// let store = MemoryStore::new()
//     .transformed()
//     .map_ref(|key: &&str| key.to_uppercase())
//     .observed(sink.clone());
//
// let store = store.put("item", 1);
// let (store, value) = store.get(&"item");
// assert_eq!(value, Some(1));
//
// // The base store holds the mapped reference.
// assert!(store.inner().inner().contains(&"ITEM".to_string()));
// assert_eq!(sink.len(), 2);
// ```

pub mod backend;
pub mod compose;
pub mod error;
pub mod memory;
pub mod metrics;
pub mod observe;
pub mod shared;
pub mod sink;
pub mod transform;

// Re-export the most commonly used types at the crate root for convenience.
pub use backend::{Fetched, Storage};
pub use compose::StorageExt;
pub use error::{FetchError, Result, StorageError};
pub use memory::MemoryStore;
pub use metrics::{MetricsStore, StoreStats};
pub use observe::ObservingStore;
pub use shared::SharedStore;
pub use sink::{
    CollectingSink, JsonLinesSink, LogRecord, Operation, Sink, SinkLevel, TracingSink,
    TracingSinkConfig,
};
pub use transform::TransformingStore;
