//! Application-facing APIs: zones, record sets, and the [`DnsApi`] facade.

mod reconcile;
mod record_set_api;
mod zone_api;

use std::sync::Arc;

pub use reconcile::plan_changes;
pub use record_set_api::{
    AllProfileResourceRecordSetApi, GeoProfile, GeoResourceRecordSetApi, ProfileKind,
    ProfileResourceRecordSetApi, RecordSetIter, ResourceRecordSetApi, WeightedProfile,
    WeightedResourceRecordSetApi,
};
pub use zone_api::{ZoneApi, ZoneIterator};

use crate::traits::DnsProvider;

/// Entry point bundling the APIs of one provider.
///
/// ```rust,no_run
/// # use zonekit::*;
/// # fn example() -> Result<()> {
/// let api = DnsApi::new(create_provider("memory", &Credentials::Anonymous)?);
/// let zone = api.zones().put(&Zone::new("example.com")?)?;
/// let rrsets = api.basic_record_sets_in_zone(zone.id_or_name());
/// rrsets.put(
///     &ResourceRecordSet::builder()
///         .name("www.example.com.")
///         .rtype("A")
///         .ttl(300)
///         .add(RecordData::A { address: "192.0.2.1".to_string() })
///         .build()?,
/// )?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct DnsApi {
    provider: Arc<dyn DnsProvider>,
}

impl DnsApi {
    pub fn new(provider: Arc<dyn DnsProvider>) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &dyn DnsProvider {
        self.provider.as_ref()
    }

    pub fn zones(&self) -> ZoneApi<'_> {
        ZoneApi::new(self.provider.as_ref())
    }

    /// Unqualified record sets of the zone with this id (or name).
    pub fn basic_record_sets_in_zone<'a>(
        &'a self,
        id_or_name: &'a str,
    ) -> ResourceRecordSetApi<'a> {
        ResourceRecordSetApi::new(self.provider.as_ref(), id_or_name)
    }

    /// Every record set of the zone, qualified or not.
    pub fn record_sets_in_zone<'a>(
        &'a self,
        id_or_name: &'a str,
    ) -> AllProfileResourceRecordSetApi<'a> {
        AllProfileResourceRecordSetApi::new(self.provider.as_ref(), id_or_name)
    }

    /// `None` when the provider has no geo support.
    pub fn geo_record_sets_in_zone<'a>(
        &'a self,
        id_or_name: &'a str,
    ) -> Option<GeoResourceRecordSetApi<'a>> {
        (self.provider.metadata().supports_profile(GeoProfile::KIND)
            && self.provider.supported_regions().is_some())
        .then(|| GeoResourceRecordSetApi::new(self.provider.as_ref(), id_or_name))
    }

    /// `None` when the provider has no weighted support.
    pub fn weighted_record_sets_in_zone<'a>(
        &'a self,
        id_or_name: &'a str,
    ) -> Option<WeightedResourceRecordSetApi<'a>> {
        (self.provider.metadata().supports_profile(WeightedProfile::KIND)
            && self.provider.supported_weights().is_some())
        .then(|| WeightedResourceRecordSetApi::new(self.provider.as_ref(), id_or_name))
    }
}

impl std::fmt::Debug for DnsApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DnsApi")
            .field("provider", &self.provider.id())
            .finish()
    }
}
