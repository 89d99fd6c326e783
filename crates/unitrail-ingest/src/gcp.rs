//! GCP Cloud Audit Log mapping.
//!
//! Audit log entries nest the interesting fields under `protoPayload`:
//! the invoked method name and the fully-qualified resource name both live
//! there, while the timestamp sits at the top of the `LogEntry`.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use unitrail_core::event::{ProviderId, UnifiedEventType};

use crate::registry::ProviderMapping;

pub static MAPPING: Lazy<ProviderMapping> = Lazy::new(|| ProviderMapping {
    provider: ProviderId::Gcp,
    event_type_path: "protoPayload.methodName",
    timestamp_path: "timestamp",
    resource_id_path: "protoPayload.resourceName",
    required_fields: &["protoPayload", "timestamp"],
    translation: BTreeMap::from([
        // storage
        ("storage.objects.get", UnifiedEventType::StorageAccess),
        ("storage.objects.create", UnifiedEventType::StorageAccess),
        ("storage.objects.delete", UnifiedEventType::StorageAccess),
        // policy
        ("setIamPolicy", UnifiedEventType::PolicyChange),
        ("storage.buckets.setIamPolicy", UnifiedEventType::PolicyChange),
        // identity
        (
            "google.login.LoginService.loginSuccess",
            UnifiedEventType::IdentityAccess,
        ),
        // compute
        ("v1.compute.instances.start", UnifiedEventType::ComputeLifecycle),
        ("v1.compute.instances.delete", UnifiedEventType::ComputeLifecycle),
        // network
        ("v1.compute.firewalls.insert", UnifiedEventType::NetworkActivity),
        ("v1.compute.firewalls.patch", UnifiedEventType::NetworkActivity),
    ]),
});
