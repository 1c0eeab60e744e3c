//! `DnsProvider` implementation for [`MemoryProvider`].

use std::collections::{BTreeMap, BTreeSet};

use log::debug;

use crate::error::{ProviderError, ProviderResult};
use crate::traits::DnsProvider;
use crate::types::{
    ChangeSet, NativeRecord, Page, ProviderMetadata, RecordFilter, RecordOrdering,
    ResourceRecordSet, Zone,
};
use crate::utils::names::absolute_name;

use super::store::StoredZone;
use super::{MemoryProvider, PROVIDER_NAME, WEIGHTS};

/// Geo regions the provider can target, keyed by region label.
const REGIONS: &[(&str, &[&str])] = &[
    ("Anonymous Proxy", &["A1"]),
    ("Satellite Provider", &["A2"]),
    ("Unknown IP", &["--"]),
    ("Europe", &["DE", "FR", "GB", "IE", "NL", "SE"]),
    ("North America", &["CA", "MX", "US"]),
    ("Asia", &["CN", "IN", "JP", "KR", "SG"]),
    ("US-East", &["US-NJ", "US-NY", "US-VA"]),
    ("US-West", &["US-CA", "US-OR", "US-WA"]),
];

/// One page of `items` starting at the offset encoded in `token`.
fn page_of<T: Clone>(
    items: &[T],
    token: Option<&str>,
    page_size: usize,
) -> ProviderResult<Page<T>> {
    let start = match token {
        None => 0,
        Some(t) => t
            .parse::<usize>()
            .ok()
            .filter(|s| *s <= items.len())
            .ok_or_else(|| {
                ProviderError::parse(PROVIDER_NAME, format!("invalid page token '{t}'"))
            })?,
    };
    let end = (start + page_size).min(items.len());
    let next = (end < items.len()).then(|| end.to_string());
    Ok(Page::new(items[start..end].to_vec(), next))
}

impl MemoryProvider {
    fn zone_not_found(zone: &str) -> ProviderError {
        ProviderError::ZoneNotFound {
            provider: PROVIDER_NAME.to_string(),
            zone: zone.to_string(),
        }
    }

    fn find<'z>(
        zones: &'z mut [StoredZone],
        id_or_name: &str,
    ) -> ProviderResult<&'z mut StoredZone> {
        zones
            .iter_mut()
            .find(|z| z.zone.id_or_name() == id_or_name)
            .ok_or_else(|| Self::zone_not_found(id_or_name))
    }

    fn check_supported(&self, rrset: &ResourceRecordSet) -> ProviderResult<()> {
        let rtype = rrset.rtype().to_ascii_uppercase();
        let supported = match rrset.profile() {
            None => self.metadata.basic_record_types.contains(&rtype),
            Some(profile) => {
                let kind = if profile.as_geo().is_some() { "geo" } else { "weighted" };
                self.metadata
                    .profile_record_types
                    .get(kind)
                    .is_some_and(|types| types.contains(&rtype))
            }
        };
        if supported {
            Ok(())
        } else {
            Err(ProviderError::UnsupportedRecordType {
                provider: PROVIDER_NAME.to_string(),
                record_type: rrset.rtype().to_string(),
            })
        }
    }

    /// Records of `zone` in listing order.
    fn listing(&self, zone: &StoredZone) -> Vec<NativeRecord> {
        let mut records = zone.records.clone();
        if self.metadata.record_ordering == RecordOrdering::Sorted {
            records.sort_by(|a, b| {
                (&a.name, &a.record_type, &a.qualifier)
                    .cmp(&(&b.name, &b.record_type, &b.qualifier))
            });
        }
        records
    }
}

impl DnsProvider for MemoryProvider {
    fn id(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn metadata(&self) -> &ProviderMetadata {
        &self.metadata
    }

    fn fetch_zone_page(&self, page_token: Option<&str>) -> ProviderResult<Page<Zone>> {
        let zones: Vec<Zone> = self.zones.read().iter().map(|z| z.zone.clone()).collect();
        page_of(&zones, page_token, self.page_size)
    }

    fn get_zone(&self, id_or_name: &str) -> ProviderResult<Option<Zone>> {
        Ok(self
            .zones
            .read()
            .iter()
            .find(|z| z.zone.id_or_name() == id_or_name)
            .map(|z| z.zone.clone()))
    }

    fn create_zone(&self, zone: &Zone) -> ProviderResult<Zone> {
        let mut zones = self.zones.write();
        let stored = if self.metadata.supports_duplicate_zone_names {
            Zone::with_id(zone.name(), uuid::Uuid::new_v4().to_string())
        } else {
            if zones
                .iter()
                .any(|z| z.zone.name().eq_ignore_ascii_case(zone.name()))
            {
                return Err(ProviderError::ZoneExists {
                    provider: PROVIDER_NAME.to_string(),
                    zone: zone.name().to_string(),
                });
            }
            Zone::new(zone.name())
        };
        let stored = stored.map_err(|e| ProviderError::parse(PROVIDER_NAME, e.to_string()))?;
        debug!("[memory] Created zone {}", stored.id_or_name());
        zones.push(StoredZone::new(stored.clone()));
        Ok(stored)
    }

    fn delete_zone(&self, id_or_name: &str) -> ProviderResult<()> {
        let mut zones = self.zones.write();
        let before = zones.len();
        zones.retain(|z| z.zone.id_or_name() != id_or_name);
        if zones.len() == before {
            return Err(Self::zone_not_found(id_or_name));
        }
        Ok(())
    }

    fn fetch_record_page(
        &self,
        zone: &str,
        filter: &RecordFilter,
        page_token: Option<&str>,
    ) -> ProviderResult<Page<NativeRecord>> {
        let zones = self.zones.read();
        let stored = zones
            .iter()
            .find(|z| z.zone.id_or_name() == zone)
            .ok_or_else(|| Self::zone_not_found(zone))?;
        let matching: Vec<NativeRecord> = self
            .listing(stored)
            .into_iter()
            .filter(|r| {
                filter.matches(
                    &absolute_name(&r.name, stored.zone.name()),
                    &r.record_type,
                    r.qualifier.as_deref(),
                )
            })
            .collect();
        page_of(&matching, page_token, self.page_size)
    }

    fn create_records(&self, zone: &str, rrset: &ResourceRecordSet) -> ProviderResult<()> {
        self.check_supported(rrset)?;
        let mut zones = self.zones.write();
        Self::find(&mut zones, zone)?.add(rrset);
        Ok(())
    }

    fn delete_records(&self, zone: &str, rrset: &ResourceRecordSet) -> ProviderResult<()> {
        let mut zones = self.zones.write();
        Self::find(&mut zones, zone)?.remove(rrset);
        Ok(())
    }

    /// Applies both sides under one write lock; nothing changes on error.
    fn apply_changes(&self, zone: &str, changes: &ChangeSet) -> ProviderResult<()> {
        if let Some(add) = &changes.to_add {
            self.check_supported(add)?;
        }
        let mut zones = self.zones.write();
        let stored = Self::find(&mut zones, zone)?;
        if let Some(add) = &changes.to_add {
            stored.add(add);
        }
        if let Some(delete) = &changes.to_delete {
            stored.remove(delete);
        }
        Ok(())
    }

    fn supported_regions(&self) -> Option<BTreeMap<String, BTreeSet<String>>> {
        self.metadata.supports_profile("geo").then(|| {
            REGIONS
                .iter()
                .map(|(region, territories)| {
                    (
                        (*region).to_string(),
                        territories.iter().map(|t| (*t).to_string()).collect(),
                    )
                })
                .collect()
        })
    }

    fn supported_weights(&self) -> Option<Vec<u32>> {
        self.metadata
            .supports_profile("weighted")
            .then(|| WEIGHTS.collect())
    }
}
