//! Provider registry, factory functions and configuration.

use std::collections::BTreeMap;
use std::sync::Arc;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::traits::DnsProvider;
use crate::types::{Credentials, ProviderMetadata};

#[cfg(feature = "memory")]
use crate::providers::MemoryProvider;

/// Builds a provider from credentials already validated against its metadata.
pub type ProviderConstructor = fn(&BTreeMap<String, String>) -> Result<Arc<dyn DnsProvider>>;

/// One registered provider.
#[derive(Clone, Copy)]
pub struct ProviderEntry {
    pub metadata: fn() -> ProviderMetadata,
    pub constructor: ProviderConstructor,
}

impl std::fmt::Debug for ProviderEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderEntry")
            .field("name", &(self.metadata)().name)
            .finish_non_exhaustive()
    }
}

/// Explicit list of the providers that can be created by name.
#[derive(Debug, Clone)]
pub struct ProviderRegistry {
    entries: Vec<ProviderEntry>,
}

impl ProviderRegistry {
    /// Providers compiled in via feature flags.
    pub fn builtin() -> Self {
        Self {
            entries: vec![
                #[cfg(feature = "memory")]
                ProviderEntry {
                    metadata: MemoryProvider::default_metadata,
                    constructor: MemoryProvider::create,
                },
            ],
        }
    }

    /// Registry holding exactly `entries`.
    pub fn with_entries(entries: impl IntoIterator<Item = ProviderEntry>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Adds an entry; a later entry with the same name shadows earlier ones.
    #[must_use]
    pub fn register(mut self, entry: ProviderEntry) -> Self {
        self.entries.insert(0, entry);
        self
    }

    fn entry(&self, name: &str) -> Option<&ProviderEntry> {
        self.entries
            .iter()
            .find(|e| (e.metadata)().name.eq_ignore_ascii_case(name))
    }

    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|e| (e.metadata)().name).collect()
    }

    pub fn metadata(&self, name: &str) -> Option<ProviderMetadata> {
        self.entry(name).map(|e| (e.metadata)())
    }

    pub fn all_metadata(&self) -> Vec<ProviderMetadata> {
        self.entries.iter().map(|e| (e.metadata)()).collect()
    }

    /// Validates `credentials` against the provider's metadata and builds it.
    pub fn create(&self, name: &str, credentials: &Credentials) -> Result<Arc<dyn DnsProvider>> {
        let entry = self
            .entry(name)
            .ok_or_else(|| Error::ProviderNotFound(name.to_string()))?;
        let metadata = (entry.metadata)();
        let validated = credentials.validate(&metadata)?;
        debug!(
            "Creating provider {} with {} credential parts",
            metadata.name,
            validated.len()
        );
        (entry.constructor)(&validated)
    }

    pub fn create_from_config(&self, config: &ProviderConfig) -> Result<Arc<dyn DnsProvider>> {
        self.create(&config.provider, &config.credentials)
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Serializable provider selection.
///
/// ```json
/// { "provider": "memory", "credentials": null }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub provider: String,
    #[serde(default)]
    pub credentials: Credentials,
}

impl ProviderConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| Error::invalid_argument(format!("invalid provider config: {e}")))
    }
}

/// Creates a built-in [`DnsProvider`] by name.
///
/// # Examples
///
/// ```rust,no_run
/// use zonekit::{create_provider, Credentials};
///
/// let provider = create_provider("memory", &Credentials::Anonymous).unwrap();
/// ```
pub fn create_provider(name: &str, credentials: &Credentials) -> Result<Arc<dyn DnsProvider>> {
    ProviderRegistry::builtin().create(name, credentials)
}

/// Returns metadata for all providers enabled via feature flags.
pub fn get_all_provider_metadata() -> Vec<ProviderMetadata> {
    ProviderRegistry::builtin().all_metadata()
}
