//! Required-field presence checks.
//!
//! Presence is judged on top-level keys only. A key that is present with a
//! `null` value passes this gate -- emptiness is caught later, when the
//! individual field is extracted.

use serde_json::{Map, Value};

use crate::registry::ProviderMapping;

/// Returns the mapping's required fields absent from `document`, in the
/// order the mapping declares them.
pub fn missing_required_fields(
    mapping: &ProviderMapping,
    document: &Map<String, Value>,
) -> Vec<&'static str> {
    mapping
        .required_fields
        .iter()
        .filter(|field| !document.contains_key(**field))
        .copied()
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
