//! Zone-scoped read/write access to record sets.

use std::collections::{BTreeMap, BTreeSet};
use std::marker::PhantomData;

use crate::error::{Error, ProviderError, Result};
use crate::grouping::GroupingIterator;
use crate::services::reconcile;
use crate::traits::DnsProvider;
use crate::types::{ChangeSet, RecordFilter, ResourceRecordSet, Zone};
use crate::utils::names::absolute_name;

/// Which record sets a view exposes.
#[derive(Debug, Clone, Copy)]
enum SetKind {
    Basic,
    All,
    /// Sets accepted by a [`ProfileKind::admits`].
    Profile(fn(&ResourceRecordSet) -> bool),
}

impl SetKind {
    fn admits(self, rrset: &ResourceRecordSet) -> bool {
        match self {
            Self::Basic => rrset.qualifier().is_none(),
            Self::All => true,
            Self::Profile(admits) => admits(rrset),
        }
    }
}

/// A missing zone is a caller error, not a provider failure.
fn zone_missing_to_invalid(e: Error) -> Error {
    match e {
        Error::Provider(ProviderError::ZoneNotFound { zone, .. }) => {
            Error::invalid_argument(format!("zone {zone} not found"))
        }
        other => other,
    }
}

/// Lazily yields the record sets of a zone visible through one API.
#[derive(Debug)]
pub struct RecordSetIter<'a> {
    inner: GroupingIterator<'a>,
    kind: SetKind,
}

impl Iterator for RecordSetIter<'_> {
    type Item = Result<ResourceRecordSet>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.inner.next()? {
                Ok(rrset) if self.kind.admits(&rrset) => return Some(Ok(rrset)),
                Ok(_) => {}
                Err(e) => return Some(Err(zone_missing_to_invalid(e))),
            }
        }
    }
}

impl std::iter::FusedIterator for RecordSetIter<'_> {}

/// Provider and zone handle shared by every record-set API.
#[derive(Clone, Copy)]
struct Scope<'a> {
    provider: &'a dyn DnsProvider,
    zone_id: &'a str,
}

impl<'a> Scope<'a> {
    fn zone(&self) -> Result<Zone> {
        self.provider
            .get_zone(self.zone_id)?
            .ok_or_else(|| Error::invalid_argument(format!("zone {} not found", self.zone_id)))
    }

    fn iter(&self, filter: RecordFilter, kind: SetKind) -> Result<RecordSetIter<'a>> {
        let zone = self.zone()?;
        Ok(RecordSetIter {
            inner: GroupingIterator::for_provider(self.provider, &zone, filter),
            kind,
        })
    }

    fn find_in(
        &self,
        zone: &Zone,
        name: &str,
        rtype: &str,
        qualifier: Option<&str>,
    ) -> Result<Option<ResourceRecordSet>> {
        let mut filter = RecordFilter::by_name_and_type(name, rtype);
        if let Some(q) = qualifier {
            filter = filter.with_qualifier(q);
        }
        for rrset in GroupingIterator::for_provider(self.provider, zone, filter) {
            let rrset = rrset.map_err(zone_missing_to_invalid)?;
            if rrset.qualifier() == qualifier {
                return Ok(Some(rrset));
            }
        }
        Ok(None)
    }

    fn find(
        &self,
        name: &str,
        rtype: &str,
        qualifier: Option<&str>,
    ) -> Result<Option<ResourceRecordSet>> {
        let zone = self.zone()?;
        self.find_in(&zone, name, rtype, qualifier)
    }

    fn put(&self, rrset: &ResourceRecordSet) -> Result<ChangeSet> {
        reconcile::check_desired(rrset)?;
        let zone = self.zone()?;
        let absolute = absolute_name(rrset.name(), zone.name());
        let owned;
        let desired = if absolute == rrset.name() {
            rrset
        } else {
            owned = rrset.to_builder().name(absolute).build()?;
            &owned
        };
        let current = self.find_in(&zone, desired.name(), desired.rtype(), desired.qualifier())?;
        reconcile::put(self.provider, &zone, desired, current.as_ref())
    }

    fn delete(&self, name: &str, rtype: &str, qualifier: Option<&str>) -> Result<()> {
        let zone = self.zone()?;
        let current = self.find_in(&zone, name, rtype, qualifier)?;
        reconcile::delete(self.provider, &zone, current.as_ref())
    }

    /// Deletes every set with this name and type that `kind` admits.
    fn delete_all(&self, name: &str, rtype: &str, kind: SetKind) -> Result<()> {
        let zone = self.zone()?;
        let filter = RecordFilter::by_name_and_type(name, rtype);
        let sets = GroupingIterator::for_provider(self.provider, &zone, filter)
            .collect::<Result<Vec<_>>>()
            .map_err(zone_missing_to_invalid)?;
        for rrset in sets.iter().filter(|s| kind.admits(s)) {
            reconcile::delete(self.provider, &zone, Some(rrset))?;
        }
        Ok(())
    }
}

/// Record sets without a qualifier.
///
/// Lookups return `Ok(None)` or an empty iterator when nothing matches;
/// [`Error::InvalidArgument`] means the zone does not exist.
#[derive(Clone, Copy)]
pub struct ResourceRecordSetApi<'a> {
    scope: Scope<'a>,
}

impl<'a> ResourceRecordSetApi<'a> {
    pub(crate) fn new(provider: &'a dyn DnsProvider, zone_id: &'a str) -> Self {
        Self {
            scope: Scope { provider, zone_id },
        }
    }

    pub fn iter(&self) -> Result<RecordSetIter<'a>> {
        self.scope.iter(RecordFilter::all(), SetKind::Basic)
    }

    pub fn iterate_by_name(&self, name: &str) -> Result<RecordSetIter<'a>> {
        self.scope.iter(RecordFilter::by_name(name), SetKind::Basic)
    }

    pub fn get_by_name_and_type(
        &self,
        name: &str,
        rtype: &str,
    ) -> Result<Option<ResourceRecordSet>> {
        self.scope.find(name, rtype, None)
    }

    /// Makes the provider hold exactly `rrset`, sending only the difference.
    ///
    /// Rejects qualified sets; use [`AllProfileResourceRecordSetApi`] for those.
    pub fn put(&self, rrset: &ResourceRecordSet) -> Result<ChangeSet> {
        if rrset.qualifier().is_some() {
            return Err(Error::invalid_argument(format!(
                "{} {} is qualified; basic record sets carry no qualifier",
                rrset.name(),
                rrset.rtype()
            )));
        }
        self.scope.put(rrset)
    }

    /// Idempotent: deleting an absent set succeeds without provider calls.
    pub fn delete_by_name_and_type(&self, name: &str, rtype: &str) -> Result<()> {
        self.scope.delete(name, rtype, None)
    }
}

/// Record sets of every kind, qualified or not.
#[derive(Clone, Copy)]
pub struct AllProfileResourceRecordSetApi<'a> {
    scope: Scope<'a>,
}

impl<'a> AllProfileResourceRecordSetApi<'a> {
    pub(crate) fn new(provider: &'a dyn DnsProvider, zone_id: &'a str) -> Self {
        Self {
            scope: Scope { provider, zone_id },
        }
    }

    pub fn iter(&self) -> Result<RecordSetIter<'a>> {
        self.scope.iter(RecordFilter::all(), SetKind::All)
    }

    pub fn iterate_by_name(&self, name: &str) -> Result<RecordSetIter<'a>> {
        self.scope.iter(RecordFilter::by_name(name), SetKind::All)
    }

    pub fn iterate_by_name_and_type(&self, name: &str, rtype: &str) -> Result<RecordSetIter<'a>> {
        self.scope
            .iter(RecordFilter::by_name_and_type(name, rtype), SetKind::All)
    }

    pub fn get_by_name_type_and_qualifier(
        &self,
        name: &str,
        rtype: &str,
        qualifier: &str,
    ) -> Result<Option<ResourceRecordSet>> {
        self.scope.find(name, rtype, Some(qualifier))
    }

    /// Puts `rrset` against the set sharing its name, type and qualifier.
    pub fn put(&self, rrset: &ResourceRecordSet) -> Result<ChangeSet> {
        self.scope.put(rrset)
    }

    /// Deletes every set with this name and type, whatever its qualifier.
    pub fn delete_by_name_and_type(&self, name: &str, rtype: &str) -> Result<()> {
        self.scope.delete_all(name, rtype, SetKind::All)
    }

    pub fn delete_by_name_type_and_qualifier(
        &self,
        name: &str,
        rtype: &str,
        qualifier: &str,
    ) -> Result<()> {
        self.scope.delete(name, rtype, Some(qualifier))
    }
}

/// Marker for one profile kind served by [`ProfileResourceRecordSetApi`].
pub trait ProfileKind {
    /// Key of this kind in [`ProviderMetadata::profile_record_types`](crate::ProviderMetadata::profile_record_types).
    const KIND: &'static str;

    /// Whether `rrset` carries a profile of this kind.
    fn admits(rrset: &ResourceRecordSet) -> bool;
}

/// Geo profile marker.
#[derive(Debug, Clone, Copy)]
pub enum GeoProfile {}

/// Weighted profile marker.
#[derive(Debug, Clone, Copy)]
pub enum WeightedProfile {}

impl ProfileKind for GeoProfile {
    const KIND: &'static str = "geo";

    fn admits(rrset: &ResourceRecordSet) -> bool {
        rrset.geo().is_some()
    }
}

impl ProfileKind for WeightedProfile {
    const KIND: &'static str = "weighted";

    fn admits(rrset: &ResourceRecordSet) -> bool {
        rrset.weighted().is_some()
    }
}

/// Record sets carrying one kind of profile.
pub struct ProfileResourceRecordSetApi<'a, P> {
    scope: Scope<'a>,
    _kind: PhantomData<P>,
}

/// Record sets with a [`Geo`](crate::Geo) profile.
pub type GeoResourceRecordSetApi<'a> = ProfileResourceRecordSetApi<'a, GeoProfile>;

/// Record sets with a [`Weighted`](crate::Weighted) profile.
pub type WeightedResourceRecordSetApi<'a> = ProfileResourceRecordSetApi<'a, WeightedProfile>;

impl<P> Clone for ProfileResourceRecordSetApi<'_, P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P> Copy for ProfileResourceRecordSetApi<'_, P> {}

impl<'a, P: ProfileKind> ProfileResourceRecordSetApi<'a, P> {
    pub(crate) fn new(provider: &'a dyn DnsProvider, zone_id: &'a str) -> Self {
        Self {
            scope: Scope { provider, zone_id },
            _kind: PhantomData,
        }
    }

    fn kind() -> SetKind {
        SetKind::Profile(P::admits)
    }

    pub fn iter(&self) -> Result<RecordSetIter<'a>> {
        self.scope.iter(RecordFilter::all(), Self::kind())
    }

    pub fn iterate_by_name(&self, name: &str) -> Result<RecordSetIter<'a>> {
        self.scope.iter(RecordFilter::by_name(name), Self::kind())
    }

    pub fn iterate_by_name_and_type(&self, name: &str, rtype: &str) -> Result<RecordSetIter<'a>> {
        self.scope
            .iter(RecordFilter::by_name_and_type(name, rtype), Self::kind())
    }

    pub fn get_by_name_type_and_qualifier(
        &self,
        name: &str,
        rtype: &str,
        qualifier: &str,
    ) -> Result<Option<ResourceRecordSet>> {
        Ok(self
            .scope
            .find(name, rtype, Some(qualifier))?
            .filter(|s| Self::kind().admits(s)))
    }

    /// Rejects a set that does not carry this API's profile.
    pub fn put(&self, rrset: &ResourceRecordSet) -> Result<ChangeSet> {
        if !Self::kind().admits(rrset) {
            return Err(Error::invalid_argument(format!(
                "{} {} has no {} profile",
                rrset.name(),
                rrset.rtype(),
                P::KIND
            )));
        }
        self.scope.put(rrset)
    }

    /// Deletes every set of this profile with this name and type.
    pub fn delete_by_name_and_type(&self, name: &str, rtype: &str) -> Result<()> {
        self.scope.delete_all(name, rtype, Self::kind())
    }

    pub fn delete_by_name_type_and_qualifier(
        &self,
        name: &str,
        rtype: &str,
        qualifier: &str,
    ) -> Result<()> {
        let zone = self.scope.zone()?;
        let current = self
            .scope
            .find_in(&zone, name, rtype, Some(qualifier))?
            .filter(|s| Self::kind().admits(s));
        reconcile::delete(self.scope.provider, &zone, current.as_ref())
    }
}

impl GeoResourceRecordSetApi<'_> {
    /// Region label → territory codes the provider can target.
    pub fn supported_regions(&self) -> BTreeMap<String, BTreeSet<String>> {
        self.scope.provider.supported_regions().unwrap_or_default()
    }
}

impl WeightedResourceRecordSetApi<'_> {
    pub fn supported_weights(&self) -> Vec<u32> {
        self.scope.provider.supported_weights().unwrap_or_default()
    }
}
