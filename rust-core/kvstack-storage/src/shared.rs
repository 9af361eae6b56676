// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Single-owner cell for sharing one store between tasks.
//
// The storage contract has no locking: a store is a value that one caller
// threads through its calls. When several tokio tasks need to work against
// one authoritative store, `SharedStore` holds that value behind an async
// mutex. Each call checks the store out, runs exactly one contract operation
// on it, and puts the successor back before releasing the lock.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::warn;

use crate::backend::{Fetched, Storage};
use crate::error::{Result, StorageError};

/// A cloneable handle to one store value, serialized by an async mutex.
///
/// If a sink or transform function panics while the store is checked out,
/// the store is gone and every later call returns [`StorageError::Poisoned`].
/// After [`SharedStore::take`], later calls return [`StorageError::Taken`].
///
/// # Example
///
/// ```rust
/// use kvstack_storage::memory::MemoryStore;
/// use kvstack_storage::shared::SharedStore;
///
/// # tokio_test::block_on(async {
/// let shared = SharedStore::new(MemoryStore::new());
/// let handle = shared.clone();
///
/// handle.put("k", 1).await.unwrap();
/// assert_eq!(shared.get(&"k").await.unwrap(), Some(1));
/// # });
/// ```
#[derive(Debug)]
pub struct SharedStore<S> {
    cell: Arc<Mutex<Slot<S>>>,
}

#[derive(Debug)]
enum Slot<S> {
    Ready(S),
    /// Checked out by an operation that never put it back.
    Lost,
    /// Moved out by `take`.
    Taken,
}

impl<S> Slot<S> {
    // Leaves `Lost` behind until the caller stores a successor.
    fn check_out(&mut self) -> Result<S> {
        match std::mem::replace(self, Slot::Lost) {
            Slot::Ready(store) => Ok(store),
            Slot::Lost => {
                warn!("Shared store accessed after a panicking operation");
                Err(StorageError::Poisoned)
            }
            Slot::Taken => {
                *self = Slot::Taken;
                warn!("Shared store accessed after it was taken");
                Err(StorageError::Taken)
            }
        }
    }
}

impl<S> Clone for SharedStore<S> {
    fn clone(&self) -> Self {
        Self {
            cell: Arc::clone(&self.cell),
        }
    }
}

impl<S: Storage> SharedStore<S> {
    /// Take ownership of `store`.
    pub fn new(store: S) -> Self {
        Self {
            cell: Arc::new(Mutex::new(Slot::Ready(store))),
        }
    }

    /// Thread the store through `f`, keeping the store `f` returns.
    pub async fn apply<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(S) -> (S, T),
    {
        let mut slot = self.cell.lock().await;
        let store = slot.check_out()?;
        let (store, output) = f(store);
        *slot = Slot::Ready(store);
        Ok(output)
    }

    /// Run [`Storage::fetch`] against the shared store.
    pub async fn fetch(&self, reference: &S::Ref) -> Result<Fetched<S::Value, S::ErrorRef>> {
        self.apply(|store| store.fetch(reference)).await
    }

    /// Run [`Storage::get`] against the shared store.
    pub async fn get(&self, reference: &S::Ref) -> Result<Option<S::Value>> {
        self.apply(|store| store.get(reference)).await
    }

    /// Run [`Storage::put`], keeping the successor as the shared store.
    pub async fn put(&self, reference: S::Ref, value: S::Value) -> Result<()> {
        self.apply(|store| (store.put(reference, value), ())).await
    }

    /// Run [`Storage::delete`], keeping the successor as the shared store.
    pub async fn delete(&self, reference: &S::Ref) -> Result<()> {
        self.apply(|store| (store.delete(reference), ())).await
    }

    /// Clone the current store value without disturbing the shared one.
    pub async fn snapshot(&self) -> Result<S>
    where
        S: Clone,
    {
        self.apply(|store| {
            let copy = store.clone();
            (store, copy)
        })
        .await
    }

    /// Move the store out, leaving every handle empty.
    ///
    /// Later calls on any handle return [`StorageError::Taken`].
    pub async fn take(&self) -> Result<S> {
        let mut slot = self.cell.lock().await;
        let store = slot.check_out()?;
        *slot = Slot::Taken;
        Ok(store)
    }
}
