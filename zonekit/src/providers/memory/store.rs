use crate::types::{NativeRecord, ResourceRecordSet, Zone};
use crate::utils::names::relative_name;

/// A zone and its flat records, owners relative to the zone.
#[derive(Debug, Clone)]
pub(crate) struct StoredZone {
    pub zone: Zone,
    pub records: Vec<NativeRecord>,
}

impl StoredZone {
    pub fn new(zone: Zone) -> Self {
        Self {
            zone,
            records: Vec::new(),
        }
    }

    /// Native form of every record of `rrset`.
    pub fn to_native(&self, rrset: &ResourceRecordSet) -> Vec<NativeRecord> {
        let name = relative_name(rrset.name(), self.zone.name());
        rrset
            .records()
            .iter()
            .map(|data| NativeRecord {
                name: name.clone(),
                record_type: rrset.rtype().to_string(),
                ttl: rrset.ttl(),
                qualifier: rrset.qualifier().map(str::to_string),
                profile: rrset.profile().cloned(),
                rdata: data.to_string(),
            })
            .collect()
    }

    /// Adds the records of `rrset` that are not stored yet.
    pub fn add(&mut self, rrset: &ResourceRecordSet) {
        for record in self.to_native(rrset) {
            if !self.records.contains(&record) {
                self.records.push(record);
            }
        }
    }

    /// Removes the stored records equal to those of `rrset`, ttl and profile
    /// included. Records that are not stored are ignored.
    pub fn remove(&mut self, rrset: &ResourceRecordSet) {
        let doomed = self.to_native(rrset);
        self.records.retain(|r| !doomed.contains(r));
    }
}
