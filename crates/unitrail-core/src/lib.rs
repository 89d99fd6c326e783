//! Foundational types and durable sinks for the unitrail pipeline.
//!
//! # Overview
//!
//! Raw cloud audit events arrive in three provider dialects and leave
//! in exactly one shape. This crate owns that shape and everything it
//! is built from:
//!
//! ```text
//! raw document -> path resolution -> timestamp canonicalization
//!              -> NormalizedEvent -> bus file
//!                        \-> NormalizeError -> dead-letter file
//! ```
//!
//! - [`event`]: the unified schema ([`event::NormalizedEvent`]) and its
//!   closed vocabularies ([`event::ProviderId`],
//!   [`event::UnifiedEventType`]).
//! - [`path`]: dotted-path resolution over untyped documents.
//! - [`timestamp`]: heterogeneous timestamp representations to UTC.
//! - [`error`]: the closed validation-failure taxonomy.
//! - [`sink`]: publisher and dead-letter capabilities the pipeline
//!   holds, plus the stored dead-letter entry shape.
//! - [`bus`] / [`dead_letter`]: append-only JSONL implementations of
//!   those capabilities.
//!
//! # Invariants
//!
//! - **Pure core:** normalization helpers here are synchronous
//!   functions of their inputs; the only shared data is read-only and
//!   fixed at process start, so concurrent invocations need no
//!   coordination.
//! - **Verbatim payloads:** the original raw document is carried
//!   untouched into whichever file it ends up in.
//! - **Loud failure:** sink write and resume errors are returned,
//!   never swallowed.

pub mod bus;
pub mod dead_letter;
pub mod error;
pub mod event;
pub mod path;
pub mod sink;
pub mod timestamp;
