use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// The input type of a credential field (affects UI rendering).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Plain text input.
    Text,
    /// Masked/password input.
    Password,
}

/// Definition of a single credential part.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProviderCredentialField {
    /// Machine-readable key (e.g., `"accessKey"`).
    pub key: String,
    /// Human-readable label (e.g., `"Access Key"`).
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
}

impl ProviderCredentialField {
    pub fn text(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            field_type: FieldType::Text,
        }
    }

    pub fn password(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            field_type: FieldType::Password,
        }
    }
}

/// Order in which a provider returns records from a listing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RecordOrdering {
    /// Records of one (owner, type, qualifier) are always adjacent; grouping
    /// streams page by page.
    #[default]
    Sorted,
    /// No adjacency guarantee; grouping drains every page first.
    Unsorted,
}

/// Provider-specific pagination limits.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProviderLimits {
    /// Maximum page size for zone list requests.
    pub max_page_size_zones: u32,
    /// Maximum page size for record list requests.
    pub max_page_size_records: u32,
}

/// Static metadata describing a DNS provider.
///
/// Contains the provider's identity, accepted credential shapes, supported
/// record types and limits. Obtain via
/// [`DnsProvider::metadata()`](crate::DnsProvider::metadata) or
/// [`get_all_provider_metadata()`](crate::get_all_provider_metadata).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProviderMetadata {
    /// Registry key of the provider (e.g., `"memory"`).
    pub name: String,
    /// Endpoint the provider talks to by default.
    pub url: String,
    /// Credential type → the parts it needs, in positional order. Empty for
    /// providers that need no credentials.
    pub credential_types: BTreeMap<String, Vec<ProviderCredentialField>>,
    /// Record types storable without a profile.
    pub basic_record_types: BTreeSet<String>,
    /// Profile kind (`"geo"`, `"weighted"`) → record types it may carry.
    pub profile_record_types: BTreeMap<String, BTreeSet<String>>,
    /// Whether several zones may share a name (zones then carry ids).
    pub supports_duplicate_zone_names: bool,
    /// Ttl used when a record set does not set one.
    pub default_ttl: u32,
    pub record_ordering: RecordOrdering,
    pub limits: ProviderLimits,
}

impl ProviderMetadata {
    /// Whether the provider needs no credentials at all.
    pub fn is_anonymous(&self) -> bool {
        self.credential_types.is_empty()
    }

    pub fn supports_profile(&self, profile: &str) -> bool {
        self.profile_record_types
            .get(profile)
            .is_some_and(|types| !types.is_empty())
    }
}
