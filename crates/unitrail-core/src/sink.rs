//! Sink capabilities the pipeline emits through.
//!
//! # Overview
//!
//! The pipeline never talks to storage directly; it holds two opaque
//! capabilities and calls exactly one of them per invocation:
//!
//! - [`EventPublisher`]: durable emission of a normalized record. A
//!   publish failure is a system-level error -- the event was valid, so
//!   it must NOT be re-routed to the dead-letter store.
//! - [`DeadLetterSink`]: durable emission of a failed raw payload with
//!   its rejection reason, invoked exactly once per validation failure.
//!   Callers treat record failures as best-effort (logged, swallowed),
//!   never as a crash.
//!
//! The durable implementations live in [`crate::bus`] and
//! [`crate::dead_letter`]; tests substitute in-memory fakes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io;
use uuid::Uuid;

use crate::event::NormalizedEvent;

/// Maximum serialized line size for the JSONL sink files. Records
/// serializing to more than this are rejected to keep scans bounded.
pub const SINK_MAX_LINE_BYTES: usize = 1_048_576;

/// Durable emission of fully normalized records.
pub trait EventPublisher {
    fn publish(&mut self, event: &NormalizedEvent) -> io::Result<()>;
}

/// Durable emission of rejected payloads with their reasons.
pub trait DeadLetterSink {
    fn record(&mut self, entry: &DeadLetterEntry) -> io::Result<()>;
}

/// One rejected payload as stored in the dead-letter file.
///
/// `provider` is recorded exactly as the caller sent it, not
/// canonicalized: a rejection may happen before any canonical form
/// exists. `raw_payload` is the original document, unmodified.
///
/// # Canonical JSONL field order
///
/// ```text
/// dlq_id, provider, error_details, failure_timestamp_utc, raw_payload
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeadLetterEntry {
    /// Fresh random identifier for this rejection.
    pub dlq_id: String,
    /// Provider string as received from the caller.
    pub provider: String,
    /// Human-readable rejection reason.
    pub error_details: String,
    /// When the rejection was recorded.
    pub failure_timestamp_utc: DateTime<Utc>,
    /// The offending document, preserved verbatim.
    pub raw_payload: Value,
}

impl DeadLetterEntry {
    /// Build an entry for a rejected payload, stamping the current time
    /// and a fresh `dlq_id`.
    pub fn new(
        provider: impl Into<String>,
        raw_payload: Value,
        error_details: impl Into<String>,
    ) -> Self {
        DeadLetterEntry {
            dlq_id: Uuid::new_v4().to_string(),
            provider: provider.into(),
            error_details: error_details.into(),
            failure_timestamp_utc: Utc::now(),
            raw_payload,
        }
    }
}
