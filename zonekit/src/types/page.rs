use serde::{Deserialize, Serialize};

use super::profile::Profile;
use super::rrset::ResourceRecordSet;

/// One page of a provider listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items in the current page.
    pub items: Vec<T>,
    /// Opaque token for the following page; `None` on the last page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, next_page_token: Option<String>) -> Self {
        Self {
            items,
            next_page_token,
        }
    }

    pub fn last(items: Vec<T>) -> Self {
        Self::new(items, None)
    }

    pub fn has_more(&self) -> bool {
        self.next_page_token.is_some()
    }
}

/// Narrows a record listing. Unset fields match everything.
///
/// `name` is compared against absolute owner names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub rtype: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualifier: Option<String>,
}

impl RecordFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn by_name_and_type(name: impl Into<String>, rtype: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            rtype: Some(rtype.into()),
            qualifier: None,
        }
    }

    #[must_use]
    pub fn with_qualifier(mut self, qualifier: impl Into<String>) -> Self {
        self.qualifier = Some(qualifier.into());
        self
    }

    /// Whether a record with this absolute owner, type and qualifier passes.
    pub fn matches(&self, name: &str, rtype: &str, qualifier: Option<&str>) -> bool {
        self.name
            .as_deref()
            .is_none_or(|n| n.eq_ignore_ascii_case(name))
            && self
                .rtype
                .as_deref()
                .is_none_or(|t| t.eq_ignore_ascii_case(rtype))
            && self.qualifier.as_deref().is_none_or(|q| Some(q) == qualifier)
    }
}

/// A record as a provider lists it: one rdata value, flat, with the owner
/// possibly relative to the zone (`"@"` for the apex).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NativeRecord {
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<Profile>,
    /// Presentation-format rdata, turned into typed data by
    /// [`DnsProvider::raw_to_rdata`](crate::DnsProvider::raw_to_rdata).
    pub rdata: String,
}

/// Records to add and remove in one provider update.
///
/// Both sides share name, type and qualifier with the desired set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_add: Option<ResourceRecordSet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_delete: Option<ResourceRecordSet>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.to_add.is_none() && self.to_delete.is_none()
    }
}
