use serde::{Deserialize, Serialize};

use super::profile::{Geo, Profile, Weighted};
use super::rdata::{MAX_NAME_LEN, RecordData};
use crate::error::{Error, Result};

/// Largest ttl a record set may carry (RFC 2181, 2^31 - 1).
pub const MAX_TTL: u32 = 2_147_483_647;

/// A group of records sharing owner name, type and qualifier.
///
/// Immutable once built; use [`ResourceRecordSet::builder`] or
/// [`ResourceRecordSet::to_builder`]. Equality is structural over every field
/// and record order is significant. Deserialization goes through
/// [`Builder::build`], so the same checks apply.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawRecordSet")]
pub struct ResourceRecordSet {
    name: String,
    #[serde(rename = "type")]
    rtype: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    qualifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ttl: Option<u32>,
    records: Vec<RecordData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    profile: Option<Profile>,
}

impl ResourceRecordSet {
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Builder pre-filled with every field of this set.
    pub fn to_builder(&self) -> Builder {
        Builder::from(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rtype(&self) -> &str {
        &self.rtype
    }

    pub fn qualifier(&self) -> Option<&str> {
        self.qualifier.as_deref()
    }

    /// `None` means the provider default applies.
    pub fn ttl(&self) -> Option<u32> {
        self.ttl
    }

    pub fn records(&self) -> &[RecordData] {
        &self.records
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    pub fn geo(&self) -> Option<&Geo> {
        self.profile.as_ref().and_then(Profile::as_geo)
    }

    pub fn weighted(&self) -> Option<&Weighted> {
        self.profile.as_ref().and_then(Profile::as_weighted)
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Accumulates the fields of a [`ResourceRecordSet`]; all checks run in
/// [`build`](Builder::build), which also stores each rdata in its
/// [canonical](RecordData::canonical) form.
#[derive(Debug, Clone, Default)]
pub struct Builder {
    name: Option<String>,
    rtype: Option<String>,
    qualifier: Option<String>,
    ttl: Option<i64>,
    records: Vec<RecordData>,
    profile: Option<Profile>,
}

impl Builder {
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn rtype(mut self, rtype: impl Into<String>) -> Self {
        self.rtype = Some(rtype.into());
        self
    }

    #[must_use]
    pub fn qualifier(mut self, qualifier: impl Into<String>) -> Self {
        self.qualifier = Some(qualifier.into());
        self
    }

    /// Signed so out-of-range values reach [`build`](Builder::build) and fail there.
    #[must_use]
    pub fn ttl(mut self, ttl: i64) -> Self {
        self.ttl = Some(ttl);
        self
    }

    #[must_use]
    pub fn geo(mut self, geo: Geo) -> Self {
        self.profile = Some(Profile::Geo(geo));
        self
    }

    #[must_use]
    pub fn weighted(mut self, weighted: Weighted) -> Self {
        self.profile = Some(Profile::Weighted(weighted));
        self
    }

    #[must_use]
    pub fn profile(mut self, profile: Option<Profile>) -> Self {
        self.profile = profile;
        self
    }

    #[must_use]
    pub fn add(mut self, record: RecordData) -> Self {
        self.records.push(record);
        self
    }

    #[must_use]
    pub fn add_all(mut self, records: impl IntoIterator<Item = RecordData>) -> Self {
        self.records.extend(records);
        self
    }

    /// Replaces every record added so far.
    #[must_use]
    pub fn records(mut self, records: Vec<RecordData>) -> Self {
        self.records = records;
        self
    }

    pub fn build(self) -> Result<ResourceRecordSet> {
        let name = self
            .name
            .ok_or_else(|| Error::invalid_argument("rrset name is required"))?;
        if name.chars().count() > MAX_NAME_LEN {
            return Err(Error::invalid_argument(format!(
                "rrset name may not exceed {MAX_NAME_LEN} characters: {name}"
            )));
        }
        let rtype = self
            .rtype
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::invalid_argument("rrset type is required"))?;
        let ttl = self
            .ttl
            .map(|ttl| {
                u32::try_from(ttl)
                    .ok()
                    .filter(|t| *t <= MAX_TTL)
                    .ok_or_else(|| {
                        Error::invalid_argument(format!(
                            "ttl {ttl} is outside the range 0..={MAX_TTL}"
                        ))
                    })
            })
            .transpose()?;
        if self.profile.is_some() && self.qualifier.is_none() {
            return Err(Error::invalid_argument(format!(
                "rrset {name} {rtype} has a profile but no qualifier"
            )));
        }
        Ok(ResourceRecordSet {
            name,
            rtype,
            qualifier: self.qualifier,
            ttl,
            records: self.records.into_iter().map(RecordData::canonical).collect(),
            profile: self.profile,
        })
    }
}

/// Wire form of a record set, before validation.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRecordSet {
    name: String,
    #[serde(rename = "type")]
    rtype: String,
    #[serde(default)]
    qualifier: Option<String>,
    #[serde(default)]
    ttl: Option<i64>,
    records: Vec<RecordData>,
    #[serde(default)]
    profile: Option<Profile>,
}

impl TryFrom<RawRecordSet> for ResourceRecordSet {
    type Error = Error;

    fn try_from(raw: RawRecordSet) -> Result<Self> {
        Builder {
            name: Some(raw.name),
            rtype: Some(raw.rtype),
            qualifier: raw.qualifier,
            ttl: raw.ttl,
            records: raw.records,
            profile: raw.profile,
        }
        .build()
    }
}

impl From<&ResourceRecordSet> for Builder {
    fn from(rrset: &ResourceRecordSet) -> Self {
        Self {
            name: Some(rrset.name.clone()),
            rtype: Some(rrset.rtype.clone()),
            qualifier: rrset.qualifier.clone(),
            ttl: rrset.ttl.map(i64::from),
            records: rrset.records.clone(),
            profile: rrset.profile.clone(),
        }
    }
}
