//! AWS CloudTrail mapping.
//!
//! CloudTrail records carry the event name and timestamp at the top level
//! and name the acted-on resource as the first entry of the `resources`
//! array. Event names are PascalCase API operation names.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use unitrail_core::event::{ProviderId, UnifiedEventType};

use crate::registry::ProviderMapping;

pub static MAPPING: Lazy<ProviderMapping> = Lazy::new(|| ProviderMapping {
    provider: ProviderId::Aws,
    event_type_path: "eventName",
    timestamp_path: "eventTime",
    resource_id_path: "resources.0.ARN",
    required_fields: &["eventName", "eventTime"],
    translation: BTreeMap::from([
        // storage
        ("GetObject", UnifiedEventType::StorageAccess),
        ("PutObject", UnifiedEventType::StorageAccess),
        ("DeleteObject", UnifiedEventType::StorageAccess),
        // policy
        ("UpdatePolicy", UnifiedEventType::PolicyChange),
        ("PutBucketPolicy", UnifiedEventType::PolicyChange),
        // identity
        ("ConsoleLogin", UnifiedEventType::IdentityAccess),
        ("AssumeRole", UnifiedEventType::IdentityAccess),
        // compute
        ("RunInstances", UnifiedEventType::ComputeLifecycle),
        ("TerminateInstances", UnifiedEventType::ComputeLifecycle),
        // network
        ("AuthorizeSecurityGroupIngress", UnifiedEventType::NetworkActivity),
        ("RevokeSecurityGroupIngress", UnifiedEventType::NetworkActivity),
    ]),
});
