//! In-memory DNS provider

mod provider;
mod store;

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::Result;
use crate::traits::DnsProvider;
use crate::types::{ProviderLimits, ProviderMetadata, RecordOrdering};

use store::StoredZone;

pub(crate) const PROVIDER_NAME: &str = "memory";
pub(crate) const DEFAULT_TTL: u32 = 300;
/// Largest page the provider serves.
pub(crate) const MAX_PAGE_SIZE: u32 = 1000;
pub(crate) const DEFAULT_PAGE_SIZE: usize = 100;

const BASIC_RECORD_TYPES: &[&str] = &[
    "A", "AAAA", "CERT", "CNAME", "DS", "LOC", "MX", "NAPTR", "NS", "PTR", "SOA", "SPF", "SRV",
    "SSHFP", "TLSA", "TXT",
];

const PROFILE_RECORD_TYPES: &[&str] = &[
    "A", "AAAA", "CNAME", "MX", "NAPTR", "PTR", "SPF", "SRV", "TXT",
];

const WEIGHTS: std::ops::RangeInclusive<u32> = 0..=100;

fn type_set(types: &[&str]) -> BTreeSet<String> {
    types.iter().map(|t| (*t).to_string()).collect()
}

/// Reference backend keeping zones and flat records in process memory.
///
/// Owners are stored relative to their zone (`"@"` for the apex), like most
/// hosted DNS APIs return them. Listings are paged with opaque offset
/// tokens and filtered server-side; change sets are applied atomically.
pub struct MemoryProvider {
    pub(crate) metadata: ProviderMetadata,
    pub(crate) page_size: usize,
    pub(crate) zones: RwLock<Vec<StoredZone>>,
}

impl MemoryProvider {
    /// Provider with default settings: sorted listings, unique zone names.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> MemoryProviderBuilder {
        MemoryProviderBuilder::default()
    }

    /// Metadata of a provider built with default settings.
    pub fn default_metadata() -> ProviderMetadata {
        ProviderMetadata {
            name: PROVIDER_NAME.to_string(),
            url: "mem:".to_string(),
            credential_types: BTreeMap::new(),
            basic_record_types: type_set(BASIC_RECORD_TYPES),
            profile_record_types: BTreeMap::from([
                ("geo".to_string(), type_set(PROFILE_RECORD_TYPES)),
                ("weighted".to_string(), type_set(PROFILE_RECORD_TYPES)),
            ]),
            supports_duplicate_zone_names: false,
            default_ttl: DEFAULT_TTL,
            record_ordering: RecordOrdering::Sorted,
            limits: ProviderLimits {
                max_page_size_zones: MAX_PAGE_SIZE,
                max_page_size_records: MAX_PAGE_SIZE,
            },
        }
    }

    /// Registry constructor. The provider takes no credentials.
    pub(crate) fn create(
        _credentials: &BTreeMap<String, String>,
    ) -> Result<Arc<dyn DnsProvider>> {
        Ok(Arc::new(Self::new()))
    }
}

impl Default for MemoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

/// Settings for a [`MemoryProvider`].
#[derive(Debug, Clone)]
pub struct MemoryProviderBuilder {
    page_size: usize,
    record_ordering: RecordOrdering,
    duplicate_zone_names: bool,
}

impl Default for MemoryProviderBuilder {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            record_ordering: RecordOrdering::Sorted,
            duplicate_zone_names: false,
        }
    }
}

impl MemoryProviderBuilder {
    /// Items per listing page, clamped to `1..=1000`.
    #[must_use]
    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.clamp(1, MAX_PAGE_SIZE as usize);
        self
    }

    /// `Unsorted` lists records in insertion order, so one set's records may
    /// be interleaved with others.
    #[must_use]
    pub fn record_ordering(mut self, ordering: RecordOrdering) -> Self {
        self.record_ordering = ordering;
        self
    }

    /// Allow several zones with one name; zones then get uuid ids.
    #[must_use]
    pub fn duplicate_zone_names(mut self, enabled: bool) -> Self {
        self.duplicate_zone_names = enabled;
        self
    }

    pub fn build(self) -> MemoryProvider {
        let mut metadata = MemoryProvider::default_metadata();
        metadata.record_ordering = self.record_ordering;
        metadata.supports_duplicate_zone_names = self.duplicate_zone_names;
        MemoryProvider {
            metadata,
            page_size: self.page_size,
            zones: RwLock::new(Vec::new()),
        }
    }
}
