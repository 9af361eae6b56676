// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Error types for KVStack storage.
//
// Two distinct families live here. `FetchError` is the typed, recoverable
// "no value under this reference" outcome returned by `Storage::fetch`; it is
// a normal result, not a failure. `StorageError` covers the genuine failure
// modes of the surrounding machinery: a shared store slot lost to a panicking
// collaborator or emptied by `take`, and unparseable sink configuration.

use serde::Serialize;
use thiserror::Error;

/// The tagged absence result returned by [`crate::backend::Storage::fetch`].
///
/// The carried reference is the one the innermost store was asked for. A
/// reference-mapping decorator passes the error through untouched, so callers
/// of a decorated store see the mapped reference, not the one they supplied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchError<R> {
    /// No value is stored under the reference.
    #[error("no value stored under reference {0:?}")]
    NoRef(R),
}

impl<R> FetchError<R> {
    /// The reference that could not be resolved.
    pub fn reference(&self) -> &R {
        match self {
            FetchError::NoRef(reference) => reference,
        }
    }

    /// Consume the error, returning the unresolved reference.
    pub fn into_reference(self) -> R {
        match self {
            FetchError::NoRef(reference) => reference,
        }
    }
}

/// Failures of the machinery around the storage contract.
#[derive(Debug, Error)]
pub enum StorageError {
    /// A collaborator panicked while a shared store was checked out, so the
    /// store value it held was never returned to its cell.
    #[error("store was lost by a panicking operation")]
    Poisoned,

    /// The store was moved out of its shared cell with `take`.
    #[error("store was taken out of its shared cell")]
    Taken,

    /// Sink or store configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::InvalidConfig(err.to_string())
    }
}

/// Result alias for fallible KVStack operations.
pub type Result<T> = std::result::Result<T, StorageError>;
