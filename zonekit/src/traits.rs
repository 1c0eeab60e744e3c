use std::collections::{BTreeMap, BTreeSet};

use crate::error::{ProviderError, ProviderResult};
use crate::types::{
    ChangeSet, NativeRecord, Page, ProviderMetadata, RecordData, RecordFilter, ResourceRecordSet,
    Zone,
};

/// DNS provider primitives.
///
/// Everything above this trait (grouping, reconciliation, the record-set APIs)
/// is provider independent. Calls are blocking request/response; a provider
/// owns its transport, including timeouts and retries.
///
/// Record primitives address a zone by [`Zone::id_or_name`].
pub trait DnsProvider: Send + Sync {
    /// Provider identifier, used as the `provider` field of errors.
    fn id(&self) -> &'static str;

    /// Metadata of this provider instance.
    fn metadata(&self) -> &ProviderMetadata;

    /// One page of zones. `None` asks for the first page.
    fn fetch_zone_page(&self, page_token: Option<&str>) -> ProviderResult<Page<Zone>>;

    /// Zones with this name. Default implementation scans every page.
    fn zones_by_name(&self, name: &str) -> ProviderResult<Vec<Zone>> {
        let name = crate::utils::names::with_trailing_dot(name);
        let mut found = Vec::new();
        let mut token: Option<String> = None;
        loop {
            let page = self.fetch_zone_page(token.as_deref())?;
            found.extend(
                page.items
                    .into_iter()
                    .filter(|z| z.name().eq_ignore_ascii_case(&name)),
            );
            match page.next_page_token {
                Some(next) => token = Some(next),
                None => return Ok(found),
            }
        }
    }

    /// The zone whose id, or name when it has no id, equals `id_or_name`.
    /// Default implementation scans every page.
    fn get_zone(&self, id_or_name: &str) -> ProviderResult<Option<Zone>> {
        let mut token: Option<String> = None;
        loop {
            let page = self.fetch_zone_page(token.as_deref())?;
            if let Some(zone) = page.items.into_iter().find(|z| z.id_or_name() == id_or_name) {
                return Ok(Some(zone));
            }
            match page.next_page_token {
                Some(next) => token = Some(next),
                None => return Ok(None),
            }
        }
    }

    /// Creates a zone and returns it as stored (with its id, if any).
    fn create_zone(&self, zone: &Zone) -> ProviderResult<Zone>;

    /// Deletes a zone. Fails with [`ProviderError::ZoneNotFound`] if absent.
    fn delete_zone(&self, id_or_name: &str) -> ProviderResult<()>;

    /// One page of flat records. Providers may honour `filter` server-side;
    /// callers filter again client-side.
    fn fetch_record_page(
        &self,
        zone: &str,
        filter: &RecordFilter,
        page_token: Option<&str>,
    ) -> ProviderResult<Page<NativeRecord>>;

    /// Turns native rdata text into typed data. Defaults to the zone-file
    /// presentation parser.
    fn raw_to_rdata(&self, record_type: &str, raw: &str) -> ProviderResult<RecordData> {
        RecordData::parse(record_type, raw).map_err(|e| ProviderError::parse(self.id(), e.to_string()))
    }

    /// Adds every record of `rrset`.
    fn create_records(&self, zone: &str, rrset: &ResourceRecordSet) -> ProviderResult<()>;

    /// Removes every record of `rrset`.
    fn delete_records(&self, zone: &str, rrset: &ResourceRecordSet) -> ProviderResult<()>;

    /// Applies a change set.
    ///
    /// The default issues the create before the delete. Providers with atomic
    /// batch updates override this.
    fn apply_changes(&self, zone: &str, changes: &ChangeSet) -> ProviderResult<()> {
        if let Some(add) = &changes.to_add {
            self.create_records(zone, add)?;
        }
        if let Some(delete) = &changes.to_delete {
            self.delete_records(zone, delete)?;
        }
        Ok(())
    }

    /// Region label → territory codes this provider can target, if it
    /// supports geo profiles.
    fn supported_regions(&self) -> Option<BTreeMap<String, BTreeSet<String>>> {
        None
    }

    /// Weights accepted by weighted profiles, if supported.
    fn supported_weights(&self) -> Option<Vec<u32>> {
        None
    }
}

impl std::fmt::Debug for dyn DnsProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DnsProvider")
            .field("id", &self.id())
            .finish_non_exhaustive()
    }
}
