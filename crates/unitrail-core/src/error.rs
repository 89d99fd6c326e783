//! Failure taxonomy for the normalization pipeline.
//!
//! # Overview
//!
//! Every way a raw payload can fail normalization is one tagged variant
//! of [`NormalizeError`], each carrying its own structured context. The
//! set is closed: boundary layers can match exhaustively when mapping
//! kinds to response classes, and tests assert on variants and fields
//! instead of message text.
//!
//! All variants here are validation-class -- caused by caller input and
//! routed to the dead-letter store before being surfaced. Sink failures
//! (publisher unavailable, disk errors) are deliberately NOT part of
//! this enum; they travel as `io::Error` and map to a server-side error
//! class without dead-letter routing, because the event itself was
//! valid.
//!
//! Display strings are the human-readable reasons recorded alongside
//! dead-lettered payloads. They carry enough context (provider, field,
//! allowed values) to debug a rejection without re-reading source, and
//! never leak stack or internal detail beyond the reason itself.

use thiserror::Error;

use crate::event::ProviderId;

/// A validation-class normalization failure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NormalizeError {
    /// The input document is not a JSON object.
    #[error("invalid payload: expected a JSON object")]
    InvalidPayloadShape,

    /// The provider id is outside the closed supported set.
    #[error("unsupported provider {provider:?} (expected one of: {})", ProviderId::NAMES.join(", "))]
    UnsupportedProvider {
        /// The rejected provider id, lower-cased and trimmed.
        provider: String,
    },

    /// The provider-specific minimal shape check failed.
    #[error("{provider} payload missing required fields: {missing:?}")]
    MissingRequiredFields {
        provider: ProviderId,
        /// Missing top-level keys, in the order the mapping declares them.
        missing: Vec<&'static str>,
    },

    /// A unified-schema field could not be resolved via path or fallback.
    #[error("missing required field {field:?}")]
    MissingNormalizedField {
        /// Unified-schema field name (`timestamp_utc`, `resource_id`,
        /// `unified_event_type`).
        field: &'static str,
    },

    /// The raw event type has no valid unified mapping.
    #[error(
        "unsupported event type {raw:?} for provider {provider} (allowed unified values: {})",
        .allowed.join(", ")
    )]
    UnsupportedEventType {
        provider: ProviderId,
        /// The trimmed raw spelling that failed both resolution tiers.
        raw: String,
        /// Canonical spellings of every accepted unified value.
        allowed: &'static [&'static str],
    },

    /// The timestamp representation is unrecognized or unparseable.
    #[error("invalid timestamp format {raw:?} (expected ISO-8601)")]
    InvalidTimestamp {
        /// The offending raw value, stringified.
        raw: String,
    },
}

impl NormalizeError {
    /// Stable machine-readable code for this failure kind.
    ///
    /// Part of the robot-mode output contract; renaming a code is a
    /// breaking change for downstream consumers.
    pub fn code(&self) -> &'static str {
        match self {
            NormalizeError::InvalidPayloadShape => "INVALID_PAYLOAD_SHAPE",
            NormalizeError::UnsupportedProvider { .. } => "UNSUPPORTED_PROVIDER",
            NormalizeError::MissingRequiredFields { .. } => "MISSING_REQUIRED_FIELDS",
            NormalizeError::MissingNormalizedField { .. } => "MISSING_NORMALIZED_FIELD",
            NormalizeError::UnsupportedEventType { .. } => "UNSUPPORTED_EVENT_TYPE",
            NormalizeError::InvalidTimestamp { .. } => "INVALID_TIMESTAMP",
        }
    }
}
