// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Log records and sinks for the observing decorator.
//
// An `ObservingStore` describes every completed operation as one
// `LogRecord` and hands it to an injected `Sink`. There is no ambient logger:
// where records end up is decided entirely by the sink passed at
// construction. Three stock sinks are provided:
//
// - `TracingSink` forwards records to the `tracing` facade.
// - `CollectingSink` buffers records in memory for later inspection.
// - `JsonLinesSink` writes one JSON document per record to any `io::Write`.
//
// Closures taking a `LogRecord` are sinks too.

use std::fmt;
use std::io::Write;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::backend::Fetched;
use crate::error::Result;

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// Which contract operation a record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Fetch,
    Get,
    Put,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Fetch => "fetch",
            Operation::Get => "get",
            Operation::Put => "put",
            Operation::Delete => "delete",
        };
        f.write_str(name)
    }
}

/// One completed storage operation, as seen by an observing decorator.
///
/// `R` and `V` are the reference and value types at the observing layer;
/// `E` is the reference type carried by not-found errors from below it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum LogRecord<R, V, E = R> {
    /// A `fetch` and the result the inner store produced.
    Fetch {
        reference: R,
        result: Fetched<V, E>,
    },
    /// A `get`; `value` is `None` when nothing was stored.
    ///
    /// In JSON an absent value omits the `value` key, so a stored value that
    /// itself serializes to `null` stays distinguishable.
    Get {
        reference: R,
        #[serde(skip_serializing_if = "Option::is_none")]
        value: Option<V>,
    },
    /// A `put` of `value`.
    Put { reference: R, value: V },
    /// A `delete`.
    Delete { reference: R },
}

impl<R, V, E> LogRecord<R, V, E> {
    /// The operation this record describes.
    pub fn operation(&self) -> Operation {
        match self {
            LogRecord::Fetch { .. } => Operation::Fetch,
            LogRecord::Get { .. } => Operation::Get,
            LogRecord::Put { .. } => Operation::Put,
            LogRecord::Delete { .. } => Operation::Delete,
        }
    }

    /// The reference the operation was called with.
    pub fn reference(&self) -> &R {
        match self {
            LogRecord::Fetch { reference, .. }
            | LogRecord::Get { reference, .. }
            | LogRecord::Put { reference, .. }
            | LogRecord::Delete { reference } => reference,
        }
    }
}

// ---------------------------------------------------------------------------
// Sink
// ---------------------------------------------------------------------------

/// Destination for the records emitted by an observing store.
///
/// Sinks are infallible from the store's point of view: `accept` has no
/// error channel, and a sink that cannot deliver a record must deal with
/// that itself. A panicking sink unwinds through the store to the caller.
pub trait Sink<R, V, E = R> {
    /// Receive one record describing a completed operation.
    fn accept(&self, record: LogRecord<R, V, E>);
}

impl<R, V, E, F> Sink<R, V, E> for F
where
    F: Fn(LogRecord<R, V, E>),
{
    fn accept(&self, record: LogRecord<R, V, E>) {
        self(record)
    }
}

// ---------------------------------------------------------------------------
// TracingSink
// ---------------------------------------------------------------------------

/// Verbosity at which [`TracingSink`] emits its events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkLevel {
    Trace,
    #[default]
    Debug,
    Info,
    Warn,
    Error,
}

/// Configuration for [`TracingSink`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TracingSinkConfig {
    /// Emitted as the `label` field, to tell apart several observed stores.
    pub label: String,
    /// Level of every emitted event.
    pub level: SinkLevel,
}

impl Default for TracingSinkConfig {
    fn default() -> Self {
        Self {
            label: "kvstack".to_string(),
            level: SinkLevel::Debug,
        }
    }
}

impl TracingSinkConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// A sink that emits one `tracing` event per record.
///
/// Events carry `label`, `operation`, `reference` and `outcome` fields.
/// The outcome is the fetch result, the looked-up value, or the stored
/// value, rendered with `Debug`; deletes have none.
#[derive(Debug, Clone, Default)]
pub struct TracingSink {
    config: TracingSinkConfig,
}

impl TracingSink {
    /// Create a sink emitting events as `config` describes.
    pub fn new(config: TracingSinkConfig) -> Self {
        Self { config }
    }

    /// Return the configuration in use.
    pub fn config(&self) -> &TracingSinkConfig {
        &self.config
    }
}

impl<R, V, E> Sink<R, V, E> for TracingSink
where
    R: fmt::Debug,
    V: fmt::Debug,
    E: fmt::Debug,
{
    fn accept(&self, record: LogRecord<R, V, E>) {
        let operation = record.operation();
        let (reference, outcome) = match &record {
            LogRecord::Fetch { reference, result } => (reference, Some(format!("{result:?}"))),
            LogRecord::Get { reference, value } => (reference, Some(format!("{value:?}"))),
            LogRecord::Put { reference, value } => (reference, Some(format!("{value:?}"))),
            LogRecord::Delete { reference } => (reference, None),
        };
        let label = self.config.label.as_str();

        macro_rules! emit {
            ($level:ident) => {
                tracing::$level!(
                    label,
                    %operation,
                    ?reference,
                    outcome = outcome.as_deref(),
                    "storage operation"
                )
            };
        }

        match self.config.level {
            SinkLevel::Trace => emit!(trace),
            SinkLevel::Debug => emit!(debug),
            SinkLevel::Info => emit!(info),
            SinkLevel::Warn => emit!(warn),
            SinkLevel::Error => emit!(error),
        }
    }
}

// ---------------------------------------------------------------------------
// CollectingSink
// ---------------------------------------------------------------------------

/// A sink that keeps every record in memory.
///
/// Clones share one buffer, so a clone kept by the caller sees the records
/// accepted by the clone moved into the store.
#[derive(Debug)]
pub struct CollectingSink<R, V, E = R> {
    records: Arc<Mutex<Vec<LogRecord<R, V, E>>>>,
}

impl<R, V, E> CollectingSink<R, V, E> {
    /// Create a sink with an empty buffer.
    pub fn new() -> Self {
        Self {
            records: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Copy out every record accepted so far, oldest first.
    pub fn records(&self) -> Vec<LogRecord<R, V, E>>
    where
        LogRecord<R, V, E>: Clone,
    {
        self.lock().clone()
    }

    /// Remove and return every record accepted so far.
    pub fn drain(&self) -> Vec<LogRecord<R, V, E>> {
        std::mem::take(&mut *self.lock())
    }

    /// Number of records currently buffered.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether no records are buffered.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // A panic while the buffer is held leaves it intact; keep using it.
    fn lock(&self) -> MutexGuard<'_, Vec<LogRecord<R, V, E>>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<R, V, E> Clone for CollectingSink<R, V, E> {
    fn clone(&self) -> Self {
        Self {
            records: Arc::clone(&self.records),
        }
    }
}

impl<R, V, E> Default for CollectingSink<R, V, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R, V, E> Sink<R, V, E> for CollectingSink<R, V, E> {
    fn accept(&self, record: LogRecord<R, V, E>) {
        self.lock().push(record);
    }
}

// ---------------------------------------------------------------------------
// JsonLinesSink
// ---------------------------------------------------------------------------

/// A sink that writes each record as one line of JSON.
///
/// Records are internally tagged: `{"operation":"put","reference":..,"value":..}`.
/// A `get` that found nothing has no `value` key.
/// Write and serialization failures are reported through `tracing` and the
/// record is dropped; the store operation still succeeds.
#[derive(Debug)]
pub struct JsonLinesSink<W: Write> {
    writer: Mutex<W>,
}

impl<W: Write> JsonLinesSink<W> {
    /// Create a sink appending lines to `writer`.
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Recover the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl<R, V, E, W> Sink<R, V, E> for JsonLinesSink<W>
where
    R: Serialize,
    V: Serialize,
    E: Serialize,
    W: Write,
{
    fn accept(&self, record: LogRecord<R, V, E>) {
        let mut line = match serde_json::to_vec(&record) {
            Ok(line) => line,
            Err(err) => {
                warn!(operation = %record.operation(), error = %err, "Failed to serialize storage record");
                return;
            }
        };
        line.push(b'\n');

        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(err) = writer.write_all(&line) {
            warn!(operation = %record.operation(), error = %err, "Failed to write storage record");
        }
    }
}
