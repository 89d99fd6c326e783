//! Unified audit event schema -- the single shape every provider feed
//! normalizes into.
//!
//! # Type overview
//!
//! - [`ProviderId`]: closed set of supported cloud providers. Parsing is
//!   case-insensitive; storage and display always use the canonical
//!   upper-case spelling (`AWS`, `AZURE`, `GCP`).
//!
//! - [`UnifiedEventType`]: closed enumeration of internal event
//!   categories. Extended only by adding enum members here -- never
//!   inferred from payload content.
//!
//! - [`NormalizedEvent`]: the output record of a successful
//!   normalization. Created through [`NormalizedEvent::assemble`], which
//!   is the sole assigner of `event_id`.
//!
//! # Serialization strategy
//!
//! - **Struct field order is canonical.** `serde` serializes fields in
//!   declaration order; the order in [`NormalizedEvent`] IS the line
//!   format on the event bus. Do not reorder fields without updating
//!   tests.
//!
//! - **Raw payload passthrough.** `raw_payload` carries the original
//!   provider document verbatim as `serde_json::Value` for audit
//!   traceability. This crate does not enable serde_json's
//!   `preserve_order` feature, so object keys re-serialize sorted and
//!   identical logical payloads produce identical bytes.
//!
//! - **Enum spellings.** Provider ids and unified event types serialize
//!   as their canonical strings (`"AWS"`, `"STORAGE_ACCESS"`), matching
//!   what `FromStr` accepts.
//!
//! # Event identity
//!
//! `event_id` is a random v4 UUID in hyphenated string form. Generation
//! needs no shared counter or lock, so concurrent normalizations stay
//! coordination-free while collisions remain negligible at any realistic
//! throughput.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Provider identifiers
// ---------------------------------------------------------------------------

/// Source cloud platform of a raw audit event.
///
/// The set is closed: supporting a new provider means adding a variant
/// here plus a mapping module in the ingest crate, nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderId {
    /// AWS CloudTrail-style events.
    #[serde(rename = "AWS")]
    Aws,
    /// Azure activity-log-style events.
    #[serde(rename = "AZURE")]
    Azure,
    /// GCP audit-log-style events.
    #[serde(rename = "GCP")]
    Gcp,
}

impl ProviderId {
    /// Every supported provider, in canonical listing order.
    pub const ALL: [ProviderId; 3] = [ProviderId::Aws, ProviderId::Azure, ProviderId::Gcp];

    /// Canonical spellings of [`Self::ALL`], for diagnostics.
    pub const NAMES: &'static [&'static str] = &["AWS", "AZURE", "GCP"];

    /// The canonical upper-case spelling used in stored records.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::Aws => "AWS",
            ProviderId::Azure => "AZURE",
            ProviderId::Gcp => "GCP",
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = ProviderParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "aws" => Ok(ProviderId::Aws),
            "azure" => Ok(ProviderId::Azure),
            "gcp" => Ok(ProviderId::Gcp),
            _ => Err(ProviderParseError(s.to_string())),
        }
    }
}

/// Error returned when parsing an unknown provider string.
#[derive(Debug, Clone)]
pub struct ProviderParseError(pub String);

impl fmt::Display for ProviderParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unsupported provider {:?} (expected one of: {})",
            self.0,
            ProviderId::NAMES.join(", ")
        )
    }
}

impl std::error::Error for ProviderParseError {}

// ---------------------------------------------------------------------------
// Unified event types
// ---------------------------------------------------------------------------

/// Internal event category shared by all providers.
///
/// Parsing accepts exactly the canonical upper-snake spellings. Raw
/// provider strings reach this parse through the translation tables (or
/// verbatim, when no table entry exists), so any string equal to one of
/// these spellings is accepted as-is by the translator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnifiedEventType {
    /// Object/blob read, write, or delete.
    #[serde(rename = "STORAGE_ACCESS")]
    StorageAccess,
    /// IAM or resource policy mutation.
    #[serde(rename = "POLICY_CHANGE")]
    PolicyChange,
    /// Sign-in, role assumption, credential use.
    #[serde(rename = "IDENTITY_ACCESS")]
    IdentityAccess,
    /// Instance/VM start, stop, create, terminate.
    #[serde(rename = "COMPUTE_LIFECYCLE")]
    ComputeLifecycle,
    /// Firewall, security-group, or routing mutation.
    #[serde(rename = "NETWORK_ACTIVITY")]
    NetworkActivity,
}

impl UnifiedEventType {
    /// Every member of the closed set, in canonical listing order.
    pub const ALL: [UnifiedEventType; 5] = [
        UnifiedEventType::StorageAccess,
        UnifiedEventType::PolicyChange,
        UnifiedEventType::IdentityAccess,
        UnifiedEventType::ComputeLifecycle,
        UnifiedEventType::NetworkActivity,
    ];

    /// Canonical spellings of [`Self::ALL`], used in rejection messages.
    pub const NAMES: &'static [&'static str] = &[
        "STORAGE_ACCESS",
        "POLICY_CHANGE",
        "IDENTITY_ACCESS",
        "COMPUTE_LIFECYCLE",
        "NETWORK_ACTIVITY",
    ];

    /// The canonical spelling as it appears in stored records.
    pub fn as_str(&self) -> &'static str {
        match self {
            UnifiedEventType::StorageAccess => "STORAGE_ACCESS",
            UnifiedEventType::PolicyChange => "POLICY_CHANGE",
            UnifiedEventType::IdentityAccess => "IDENTITY_ACCESS",
            UnifiedEventType::ComputeLifecycle => "COMPUTE_LIFECYCLE",
            UnifiedEventType::NetworkActivity => "NETWORK_ACTIVITY",
        }
    }
}

impl fmt::Display for UnifiedEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnifiedEventType {
    type Err = EventTypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "STORAGE_ACCESS" => Ok(UnifiedEventType::StorageAccess),
            "POLICY_CHANGE" => Ok(UnifiedEventType::PolicyChange),
            "IDENTITY_ACCESS" => Ok(UnifiedEventType::IdentityAccess),
            "COMPUTE_LIFECYCLE" => Ok(UnifiedEventType::ComputeLifecycle),
            "NETWORK_ACTIVITY" => Ok(UnifiedEventType::NetworkActivity),
            _ => Err(EventTypeParseError(s.to_string())),
        }
    }
}

/// Error returned when a string matches no unified event type spelling.
#[derive(Debug, Clone)]
pub struct EventTypeParseError(pub String);

impl fmt::Display for EventTypeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unrecognized unified event type: {:?}", self.0)
    }
}

impl std::error::Error for EventTypeParseError {}

// ---------------------------------------------------------------------------
// Normalized event -- what goes onto the bus
// ---------------------------------------------------------------------------

/// A fully normalized audit event in the unified schema.
///
/// Produced once per successful normalization and handed to the
/// publisher; the pipeline itself holds no persistent state. Every field
/// is non-null, and textual fields are non-empty after trimming.
///
/// # Canonical JSONL field order
///
/// ```text
/// event_id, cloud_provider, unified_event_type, timestamp_utc,
/// resource_id, raw_payload
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedEvent {
    /// Globally unique identifier, generated fresh per normalization by
    /// [`NormalizedEvent::assemble`], never reused.
    pub event_id: String,
    /// Source provider in canonical casing.
    pub cloud_provider: ProviderId,
    /// Internal event category.
    pub unified_event_type: UnifiedEventType,
    /// Event instant, timezone-normalized to UTC regardless of the
    /// source representation.
    pub timestamp_utc: DateTime<Utc>,
    /// Non-empty, trimmed identifier of the affected resource.
    pub resource_id: String,
    /// The original provider document, preserved verbatim.
    pub raw_payload: Value,
}

impl NormalizedEvent {
    /// Assemble a normalized event, assigning a fresh `event_id`.
    ///
    /// This is the intended construction path: the id is generated here
    /// and nowhere else, so callers cannot reuse or fabricate one.
    pub fn assemble(
        cloud_provider: ProviderId,
        unified_event_type: UnifiedEventType,
        timestamp_utc: DateTime<Utc>,
        resource_id: String,
        raw_payload: Value,
    ) -> Self {
        NormalizedEvent {
            event_id: Uuid::new_v4().to_string(),
            cloud_provider,
            unified_event_type,
            timestamp_utc,
            resource_id,
            raw_payload,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
