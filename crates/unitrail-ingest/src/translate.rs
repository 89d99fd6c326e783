//! Event-type translation.
//!
//! Translation resolves a provider-native event name into the unified
//! vocabulary in two ordered attempts:
//!
//! 1. the provider's translation table, keyed by the trimmed raw spelling;
//! 2. the trimmed raw spelling itself, when it is exactly a unified name.
//!
//! A name neither attempt resolves is rejected rather than guessed at.

use serde_json::Value;
use unitrail_core::error::NormalizeError;
use unitrail_core::event::UnifiedEventType;

use crate::registry::ProviderMapping;

// ---------------------------------------------------------------------------
// Result shape
// ---------------------------------------------------------------------------

/// Which attempt resolved the raw event name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslationTier {
    /// The provider's translation table had an entry for the name.
    TableMapped,
    /// The name itself spelled a unified value.
    RawSpelling,
}

/// A resolved event type plus how it was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Translation {
    pub unified: UnifiedEventType,
    pub tier: TranslationTier,
}

// ---------------------------------------------------------------------------
// Translation
// ---------------------------------------------------------------------------

/// Translates the extracted raw event-type value into the unified
/// vocabulary.
///
/// `raw` is the outcome of path resolution against the payload: absent and
/// `null` values both mean the payload never named an event type, as does a
/// value whose trimmed spelling is empty.
pub fn translate_event_type(
    mapping: &ProviderMapping,
    raw: Option<&Value>,
) -> Result<Translation, NormalizeError> {
    let value = match raw {
        Some(value) if !value.is_null() => value,
        _ => {
            return Err(NormalizeError::MissingNormalizedField {
                field: "unified_event_type",
            })
        }
    };
    let spelled = stringify(value);
    let trimmed = spelled.trim();
    if trimmed.is_empty() {
        return Err(NormalizeError::MissingNormalizedField {
            field: "unified_event_type",
        });
    }
    if let Some(unified) = mapping.translate(trimmed) {
        return Ok(Translation {
            unified,
            tier: TranslationTier::TableMapped,
        });
    }
    if let Ok(unified) = trimmed.parse::<UnifiedEventType>() {
        return Ok(Translation {
            unified,
            tier: TranslationTier::RawSpelling,
        });
    }
    Err(NormalizeError::UnsupportedEventType {
        provider: mapping.provider,
        raw: trimmed.to_string(),
        allowed: UnifiedEventType::NAMES,
    })
}

/// Renders an extracted JSON value as the text the translation and
/// resource-id fields work over. String values are taken verbatim; every
/// other kind uses its compact JSON rendering.
pub(crate) fn stringify(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use serde_json::json;
    use unitrail_core::event::ProviderId;

    use super::*;
    use crate::registry::mapping_for;

    fn aws() -> &'static ProviderMapping {
        mapping_for(ProviderId::Aws)
    }

    #[test]
    fn table_entry_resolves_with_table_tier() {
        let raw = json!("GetObject");
        let translation = translate_event_type(aws(), Some(&raw)).unwrap();
        assert_eq!(translation.unified, UnifiedEventType::StorageAccess);
        assert_eq!(translation.tier, TranslationTier::TableMapped);
    }

    #[test]
    fn unified_spelling_resolves_with_raw_tier() {
        let raw = json!("POLICY_CHANGE");
        let translation = translate_event_type(aws(), Some(&raw)).unwrap();
        assert_eq!(translation.unified, UnifiedEventType::PolicyChange);
        assert_eq!(translation.tier, TranslationTier::RawSpelling);
    }

    #[test]
    fn surrounding_whitespace_is_trimmed_before_both_attempts() {
        let raw = json!("  GetObject  ");
        let translation = translate_event_type(aws(), Some(&raw)).unwrap();
        assert_eq!(translation.tier, TranslationTier::TableMapped);

        let raw = json!("\tSTORAGE_ACCESS\n");
        let translation = translate_event_type(aws(), Some(&raw)).unwrap();
        assert_eq!(translation.tier, TranslationTier::RawSpelling);
    }

    #[test]
    fn table_wins_over_a_raw_unified_spelling() {
        let mapping = ProviderMapping {
            provider: ProviderId::Aws,
            event_type_path: "eventName",
            timestamp_path: "eventTime",
            resource_id_path: "resources.0.ARN",
            required_fields: &["eventName", "eventTime"],
            translation: BTreeMap::from([(
                "STORAGE_ACCESS",
                UnifiedEventType::PolicyChange,
            )]),
        };
        let raw = json!("STORAGE_ACCESS");
        let translation = translate_event_type(&mapping, Some(&raw)).unwrap();
        assert_eq!(translation.unified, UnifiedEventType::PolicyChange);
        assert_eq!(translation.tier, TranslationTier::TableMapped);
    }

    #[test]
    fn absent_and_null_both_mean_missing() {
        for raw in [None, Some(&Value::Null)] {
            let err = translate_event_type(aws(), raw).unwrap_err();
            assert_eq!(
                err,
                NormalizeError::MissingNormalizedField {
                    field: "unified_event_type"
                }
            );
        }
    }

    #[test]
    fn blank_spelling_means_missing() {
        for raw in [json!(""), json!("   \t")] {
            let err = translate_event_type(aws(), Some(&raw)).unwrap_err();
            assert_eq!(
                err,
                NormalizeError::MissingNormalizedField {
                    field: "unified_event_type"
                }
            );
        }
    }

    #[test]
    fn unknown_name_is_rejected_with_the_allowed_list() {
        let raw = json!("DescribeVolumes");
        let err = translate_event_type(aws(), Some(&raw)).unwrap_err();
        match err {
            NormalizeError::UnsupportedEventType {
                provider,
                raw,
                allowed,
            } => {
                assert_eq!(provider, ProviderId::Aws);
                assert_eq!(raw, "DescribeVolumes");
                assert_eq!(allowed, UnifiedEventType::NAMES);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn non_string_values_are_stringified_before_lookup() {
        let raw = json!(42);
        let err = translate_event_type(aws(), Some(&raw)).unwrap_err();
        match err {
            NormalizeError::UnsupportedEventType { raw, .. } => {
                assert_eq!(raw, "42");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn stringify_keeps_strings_verbatim_and_renders_the_rest() {
        assert_eq!(stringify(&json!("arn:aws:s3:::bucket")), "arn:aws:s3:::bucket");
        assert_eq!(stringify(&json!(true)), "true");
        assert_eq!(stringify(&json!(7.5)), "7.5");
        assert_eq!(stringify(&json!({"id": 1})), "{\"id\":1}");
    }
}
