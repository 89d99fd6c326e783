//! Raw payload to [`NormalizedEvent`] orchestration.
//!
//! [`normalize`] runs a fixed four-phase sequence against one raw payload:
//!
//! 1. validating: payload shape, provider name, required top-level keys;
//! 2. extracting: the three unified fields via the provider's paths, with a
//!    top-level fallback for the resource id;
//! 3. translating: the provider event name into the unified vocabulary;
//! 4. assembling: timestamp parsing, resource-id trimming, id assignment.
//!
//! The first violated rule decides the error. Phases never reorder, so a
//! payload broken in several ways reports the same failure every run.

use serde_json::{Map, Value};
use unitrail_core::error::NormalizeError;
use unitrail_core::event::{NormalizedEvent, ProviderId};
use unitrail_core::path::resolve_path;
use unitrail_core::timestamp::normalize_timestamp;

use crate::registry::{self, ProviderMapping};
use crate::translate::{self, translate_event_type};
use crate::validate::missing_required_fields;

/// Top-level keys tried, in order, when the mapped resource-id path
/// resolves to nothing.
const RESOURCE_ID_FALLBACK_KEYS: [&str; 2] = ["resourceId", "resource_id"];

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Normalizes one raw provider payload into a [`NormalizedEvent`].
///
/// `provider` is matched case-insensitively with surrounding whitespace
/// ignored; the returned event always carries the canonical spelling. The
/// payload itself is never altered -- the event embeds a verbatim copy.
pub fn normalize(provider: &str, payload: &Value) -> Result<NormalizedEvent, NormalizeError> {
    // Validating
    let document = payload
        .as_object()
        .ok_or(NormalizeError::InvalidPayloadShape)?;
    let provider_id =
        provider
            .parse::<ProviderId>()
            .map_err(|_| NormalizeError::UnsupportedProvider {
                provider: provider.trim().to_ascii_lowercase(),
            })?;
    let mapping = registry::mapping_for(provider_id);
    let missing = missing_required_fields(mapping, document);
    if !missing.is_empty() {
        return Err(NormalizeError::MissingRequiredFields {
            provider: provider_id,
            missing,
        });
    }

    // Extracting
    let raw_event_type = resolve_path(payload, mapping.event_type_path);
    let raw_timestamp = resolve_path(payload, mapping.timestamp_path)
        .filter(|value| is_meaningful(value))
        .ok_or(NormalizeError::MissingNormalizedField {
            field: "timestamp_utc",
        })?;
    let raw_resource_id = resolve_resource_id(payload, document, mapping)
        .filter(|value| is_meaningful(value))
        .ok_or(NormalizeError::MissingNormalizedField {
            field: "resource_id",
        })?;

    // Translating
    let translation = translate_event_type(mapping, raw_event_type)?;

    // Assembling
    let timestamp_utc = normalize_timestamp(raw_timestamp)?;
    let resource_id = translate::stringify(raw_resource_id).trim().to_string();
    if resource_id.is_empty() {
        return Err(NormalizeError::MissingNormalizedField {
            field: "resource_id",
        });
    }
    Ok(NormalizedEvent::assemble(
        provider_id,
        translation.unified,
        timestamp_utc,
        resource_id,
        payload.clone(),
    ))
}

/// Resolves the resource id, falling back to conventional top-level keys
/// when the mapped path yields nothing. Within the fallback, an empty or
/// null first key falls through to the second.
fn resolve_resource_id<'v>(
    payload: &'v Value,
    document: &'v Map<String, Value>,
    mapping: &ProviderMapping,
) -> Option<&'v Value> {
    match resolve_path(payload, mapping.resource_id_path) {
        Some(found) if !found.is_null() => Some(found),
        _ => {
            let [camel, snake] = RESOURCE_ID_FALLBACK_KEYS;
            match document.get(camel) {
                Some(value) if is_meaningful(value) => Some(value),
                _ => document.get(snake),
            }
        }
    }
}

/// A present value that is `null` or an empty string does not satisfy a
/// unified field requirement.
fn is_meaningful(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(text) => !text.is_empty(),
        _ => true,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
