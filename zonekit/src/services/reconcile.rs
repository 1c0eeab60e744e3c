//! Desired-state put: diff a desired record set against the current one and
//! apply the smallest change set.

use log::{debug, info};

use crate::error::{Error, Result};
use crate::traits::DnsProvider;
use crate::types::{ChangeSet, RecordData, ResourceRecordSet, Zone};
use crate::utils::log_sanitizer::summarize_records;

fn with_records(
    base: &ResourceRecordSet,
    records: Vec<RecordData>,
) -> Result<Option<ResourceRecordSet>> {
    if records.is_empty() {
        return Ok(None);
    }
    base.to_builder().records(records).build().map(Some)
}

/// Computes the change set turning `current` into `desired`.
///
/// An absent desired ttl means `default_ttl`. When ttl and profile both
/// match, only the records that differ are added or removed (source order
/// kept). Otherwise every current record is deleted and every desired record
/// added.
pub fn plan_changes(
    desired: &ResourceRecordSet,
    current: Option<&ResourceRecordSet>,
    default_ttl: u32,
) -> Result<ChangeSet> {
    let ttl_to_apply = desired.ttl().unwrap_or(default_ttl);
    let desired = desired.to_builder().ttl(i64::from(ttl_to_apply)).build()?;

    let Some(old) = current else {
        return Ok(ChangeSet {
            to_add: with_records(&desired, desired.records().to_vec())?,
            to_delete: None,
        });
    };

    let same_ttl = old.ttl().unwrap_or(default_ttl) == ttl_to_apply;
    if same_ttl && old.profile() == desired.profile() {
        let added: Vec<RecordData> = desired
            .records()
            .iter()
            .filter(|r| !old.records().contains(r))
            .cloned()
            .collect();
        let removed: Vec<RecordData> = old
            .records()
            .iter()
            .filter(|r| !desired.records().contains(r))
            .cloned()
            .collect();
        return Ok(ChangeSet {
            to_add: with_records(&desired, added)?,
            to_delete: with_records(old, removed)?,
        });
    }

    Ok(ChangeSet {
        to_add: with_records(&desired, desired.records().to_vec())?,
        to_delete: with_records(old, old.records().to_vec())?,
    })
}

/// Rejects sets `put` must not send to a provider.
pub(crate) fn check_desired(desired: &ResourceRecordSet) -> Result<()> {
    if desired.is_empty() {
        return Err(Error::invalid_argument("rrset was empty"));
    }
    for record in desired.records() {
        record.validate()?;
    }
    Ok(())
}

/// Plans and applies `desired` against `current` in one `apply_changes` call.
/// Returns the applied change set; nothing is sent when it is empty.
///
/// `desired` must have passed [`check_desired`].
pub(crate) fn put(
    provider: &dyn DnsProvider,
    zone: &Zone,
    desired: &ResourceRecordSet,
    current: Option<&ResourceRecordSet>,
) -> Result<ChangeSet> {
    let changes = plan_changes(desired, current, provider.metadata().default_ttl)?;
    if changes.is_empty() {
        debug!(
            "{} {} in {} already up to date",
            desired.name(),
            desired.rtype(),
            zone.name()
        );
        return Ok(changes);
    }

    debug!(
        "Planned change for {} {} (qualifier {:?}): add [{}], delete [{}]",
        desired.name(),
        desired.rtype(),
        desired.qualifier(),
        changes
            .to_add
            .as_ref()
            .map(|s| summarize_records(s.records()))
            .unwrap_or_default(),
        changes
            .to_delete
            .as_ref()
            .map(|s| summarize_records(s.records()))
            .unwrap_or_default(),
    );
    provider.apply_changes(zone.id_or_name(), &changes)?;
    info!(
        "Applied changes to {} {} in zone {}",
        desired.name(),
        desired.rtype(),
        zone.name()
    );
    Ok(changes)
}

/// Deletes `current` if present. Absence is success without provider calls.
pub(crate) fn delete(
    provider: &dyn DnsProvider,
    zone: &Zone,
    current: Option<&ResourceRecordSet>,
) -> Result<()> {
    let Some(current) = current else {
        return Ok(());
    };
    provider.delete_records(zone.id_or_name(), current)?;
    info!(
        "Deleted {} {} (qualifier {:?}) from zone {}",
        current.name(),
        current.rtype(),
        current.qualifier(),
        zone.name()
    );
    Ok(())
}
