use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Geographic visibility: region label → territory codes served by the set.
///
/// Region labels are opaque provider strings (including sentinels such as
/// `"Anonymous Proxy"`). A territory belongs to at most one region.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, BTreeSet<String>>", into = "BTreeMap<String, BTreeSet<String>>")]
pub struct Geo {
    regions: BTreeMap<String, BTreeSet<String>>,
}

impl Geo {
    /// Builds a geo profile, rejecting a territory listed under two regions.
    pub fn new(regions: BTreeMap<String, BTreeSet<String>>) -> Result<Self> {
        let mut seen: BTreeMap<&str, &str> = BTreeMap::new();
        for (region, territories) in &regions {
            for territory in territories {
                if let Some(other) = seen.insert(territory, region) {
                    return Err(Error::invalid_argument(format!(
                        "territory '{territory}' appears in regions '{other}' and '{region}'"
                    )));
                }
            }
        }
        Ok(Self { regions })
    }

    /// Shortcut for a profile with a single region.
    pub fn single<I, S>(region: impl Into<String>, territories: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let territories = territories.into_iter().map(Into::into).collect();
        Self::new(BTreeMap::from([(region.into(), territories)]))
    }

    pub fn regions(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.regions
    }
}

impl TryFrom<BTreeMap<String, BTreeSet<String>>> for Geo {
    type Error = Error;

    fn try_from(regions: BTreeMap<String, BTreeSet<String>>) -> Result<Self> {
        Self::new(regions)
    }
}

impl From<Geo> for BTreeMap<String, BTreeSet<String>> {
    fn from(geo: Geo) -> Self {
        geo.regions
    }
}

/// Weighted round-robin share. `0` conventionally means "always serve".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Weighted {
    pub weight: u32,
}

impl Weighted {
    pub fn new(weight: u32) -> Self {
        Self { weight }
    }
}

/// Visibility profile attached to a qualified record set.
///
/// Adjacently tagged (`{"type": "geo", "value": {...}}`) since geo region
/// labels are arbitrary map keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Profile {
    Geo(Geo),
    Weighted(Weighted),
}

impl Profile {
    pub fn as_geo(&self) -> Option<&Geo> {
        match self {
            Self::Geo(g) => Some(g),
            Self::Weighted(_) => None,
        }
    }

    pub fn as_weighted(&self) -> Option<&Weighted> {
        match self {
            Self::Weighted(w) => Some(w),
            Self::Geo(_) => None,
        }
    }
}

impl From<Geo> for Profile {
    fn from(geo: Geo) -> Self {
        Self::Geo(geo)
    }
}

impl From<Weighted> for Profile {
    fn from(weighted: Weighted) -> Self {
        Self::Weighted(weighted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_territory_in_two_regions() {
        let regions = BTreeMap::from([
            ("US-East".to_string(), BTreeSet::from(["US-NY".to_string()])),
            (
                "US-West".to_string(),
                BTreeSet::from(["US-CA".to_string(), "US-NY".to_string()]),
            ),
        ]);
        let err = Geo::new(regions).unwrap_err();
        assert!(err.to_string().contains("US-NY"), "{err}");
    }

    #[test]
    fn sentinel_region_is_opaque() {
        let geo = Geo::single("Anonymous Proxy", ["A1"]).unwrap();
        assert!(geo.regions().contains_key("Anonymous Proxy"));
    }

    #[test]
    fn geo_deserialize_validates() {
        let json = r#"{"type":"geo","value":{"a":["X"],"b":["X"]}}"#;
        assert!(serde_json::from_str::<Profile>(json).is_err());
    }

    #[test]
    fn region_named_type_round_trips() {
        let profile = Profile::from(Geo::single("type", ["US-NY"]).unwrap());
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["type"], "geo");
        assert_eq!(json["value"]["type"], serde_json::json!(["US-NY"]));
        let back: Profile = serde_json::from_value(json).unwrap();
        assert_eq!(back, profile);

        let weighted: Profile =
            serde_json::from_str(r#"{"type":"weighted","value":{"weight":5}}"#).unwrap();
        assert_eq!(weighted, Profile::from(Weighted::new(5)));
    }

    #[test]
    fn profile_accessors() {
        let p = Profile::from(Weighted::new(0));
        assert_eq!(p.as_weighted().map(|w| w.weight), Some(0));
        assert!(p.as_geo().is_none());
    }
}
