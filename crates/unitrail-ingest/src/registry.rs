//! Provider mapping registry.
//!
//! Every supported provider contributes one [`ProviderMapping`] describing
//! where in its raw payloads the unified fields live, which top-level keys
//! must be present before extraction starts, and how its event names
//! translate into the unified vocabulary. The registry is the single seam
//! between provider-specific knowledge and the provider-agnostic
//! normalization flow -- adding a provider means adding one mapping module
//! and one `match` arm here.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use unitrail_core::event::{ProviderId, UnifiedEventType};

use crate::{aws, azure, gcp};

// ---------------------------------------------------------------------------
// Mapping data
// ---------------------------------------------------------------------------

/// Extraction and translation rules for one provider.
///
/// Paths are dot-separated: each segment descends into an object by key, or
/// into an array by non-negative integer index.
#[derive(Debug)]
pub struct ProviderMapping {
    /// Provider the rules apply to.
    pub provider: ProviderId,
    /// Path to the provider's own event name or operation name.
    pub event_type_path: &'static str,
    /// Path to the event's occurrence timestamp.
    pub timestamp_path: &'static str,
    /// Path to the acted-on resource identifier.
    pub resource_id_path: &'static str,
    /// Top-level keys a payload must carry before extraction starts.
    pub required_fields: &'static [&'static str],
    /// Provider event names with a known unified category.
    ///
    /// Names missing from the table fall through to their raw spelling: a
    /// provider-native name that happens to match a unified spelling is
    /// accepted verbatim, and will misclassify silently if a provider ever
    /// ships an unrelated event under one of those names.
    pub translation: BTreeMap<&'static str, UnifiedEventType>,
}

impl ProviderMapping {
    /// Looks up the unified category for a provider-native event name.
    pub fn translate(&self, raw: &str) -> Option<UnifiedEventType> {
        self.translation.get(raw).copied()
    }
}

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

/// Returns the mapping for `provider`.
pub fn mapping_for(provider: ProviderId) -> &'static ProviderMapping {
    match provider {
        ProviderId::Aws => Lazy::force(&aws::MAPPING),
        ProviderId::Azure => Lazy::force(&azure::MAPPING),
        ProviderId::Gcp => Lazy::force(&gcp::MAPPING),
    }
}

/// All registered mappings, in [`ProviderId::ALL`] order.
pub fn all_mappings() -> [&'static ProviderMapping; 3] {
    ProviderId::ALL.map(mapping_for)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
