//! Azure Activity Log mapping.
//!
//! Activity Log entries use slash-delimited `operationName` values scoped
//! by resource provider namespace, and identify the target resource by its
//! full ARM `resourceId` path.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use unitrail_core::event::{ProviderId, UnifiedEventType};

use crate::registry::ProviderMapping;

pub static MAPPING: Lazy<ProviderMapping> = Lazy::new(|| ProviderMapping {
    provider: ProviderId::Azure,
    event_type_path: "operationName",
    timestamp_path: "time",
    resource_id_path: "resourceId",
    required_fields: &["operationName", "time"],
    translation: BTreeMap::from([
        // storage
        (
            "Microsoft.Storage/storageAccounts/blobServices/containers/read",
            UnifiedEventType::StorageAccess,
        ),
        (
            "Microsoft.Storage/storageAccounts/blobServices/containers/write",
            UnifiedEventType::StorageAccess,
        ),
        (
            "Microsoft.Storage/storageAccounts/blobServices/containers/delete",
            UnifiedEventType::StorageAccess,
        ),
        // policy
        (
            "Microsoft.Authorization/policyAssignments/write",
            UnifiedEventType::PolicyChange,
        ),
        (
            "Microsoft.Authorization/roleAssignments/write",
            UnifiedEventType::PolicyChange,
        ),
        // identity
        (
            "Microsoft.Authorization/elevateAccess/action",
            UnifiedEventType::IdentityAccess,
        ),
        // compute
        (
            "Microsoft.Compute/virtualMachines/start/action",
            UnifiedEventType::ComputeLifecycle,
        ),
        (
            "Microsoft.Compute/virtualMachines/deallocate/action",
            UnifiedEventType::ComputeLifecycle,
        ),
        // network
        (
            "Microsoft.Network/networkSecurityGroups/securityRules/write",
            UnifiedEventType::NetworkActivity,
        ),
    ]),
});
