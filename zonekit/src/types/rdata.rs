use std::collections::BTreeMap;
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Maximum length of a domain name carried inside rdata.
pub const MAX_NAME_LEN: usize = 255;

/// Maximum length, in bytes, of TXT/SPF character data.
pub const MAX_TEXT_LEN: usize = 65535;

const LOC_DEFAULT_SIZE: &str = "1m";
const LOC_DEFAULT_HPRECISION: &str = "10000m";
const LOC_DEFAULT_VPRECISION: &str = "10m";

/// A single rdata field value.
///
/// Numeric fields are always integers. Floats are rejected on deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    /// Integer field (preference, port, serial, ...).
    Int(i64),
    /// Text field (addresses, names, character data).
    Text(String),
}

impl Scalar {
    /// Integer view; text that spells an integer is accepted too.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }

    /// Text view, `None` for integers.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Int(_) => None,
            Self::Text(s) => Some(s),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for Scalar {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u16> for Scalar {
    fn from(value: u16) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u8> for Scalar {
    fn from(value: u8) -> Self {
        Self::Int(i64::from(value))
    }
}

/// Type-safe representation of the payload of one DNS record.
///
/// Each variant carries the fields of that record type. [`to_map`](Self::to_map)
/// gives the provider-neutral field map (`A` → `{address}`, `MX` →
/// `{preference, exchange}`, ...); [`Unknown`](Self::Unknown) keeps types this
/// crate does not model as a plain map.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "content")]
pub enum RecordData {
    /// IPv4 address.
    A { address: String },

    /// IPv6 address.
    AAAA { address: String },

    /// Canonical name.
    CNAME { cname: String },

    /// Mail exchange.
    MX { preference: u16, exchange: String },

    /// Authoritative name server.
    NS { nsdname: String },

    /// Domain name pointer.
    PTR { ptrdname: String },

    /// Start of authority.
    SOA {
        mname: String,
        rname: String,
        serial: u32,
        refresh: u32,
        retry: u32,
        expire: u32,
        minimum: u32,
    },

    /// Service locator (RFC 2782).
    SRV {
        priority: u16,
        weight: u16,
        port: u16,
        target: String,
    },

    /// Text.
    TXT { txtdata: String },

    /// Sender policy framework, same layout as TXT.
    SPF { txtdata: String },

    /// Naming authority pointer (RFC 3403).
    NAPTR {
        order: u16,
        preference: u16,
        flags: String,
        services: String,
        regexp: String,
        replacement: String,
    },

    /// Certificate (RFC 4398).
    CERT {
        format: u16,
        tag: u16,
        algorithm: u8,
        certificate: String,
    },

    /// Delegation signer (RFC 4034).
    #[serde(rename_all = "camelCase")]
    DS {
        key_tag: u16,
        algorithm_id: u8,
        digest_id: u8,
        digest: String,
    },

    /// Location (RFC 1876), kept in presentation units.
    LOC {
        latitude: String,
        longitude: String,
        altitude: String,
        diameter: String,
        hprecision: String,
        vprecision: String,
    },

    /// SSH key fingerprint (RFC 4255).
    #[serde(rename_all = "camelCase")]
    SSHFP {
        algorithm: u8,
        fingerprint_type: u8,
        fingerprint: String,
    },

    /// TLS association (RFC 6698).
    #[serde(rename_all = "camelCase")]
    TLSA {
        usage: u8,
        selector: u8,
        matching_type: u8,
        certificate_association_data: String,
    },

    /// Any other type, as an opaque field map.
    #[serde(rename_all = "camelCase")]
    Unknown {
        record_type: String,
        fields: BTreeMap<String, Scalar>,
    },
}

fn field_map<const N: usize>(pairs: [(&str, Scalar); N]) -> BTreeMap<String, Scalar> {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

impl RecordData {
    /// Mnemonic of the record type (`"A"`, `"MX"`, ...).
    pub fn record_type(&self) -> &str {
        match self {
            Self::A { .. } => "A",
            Self::AAAA { .. } => "AAAA",
            Self::CNAME { .. } => "CNAME",
            Self::MX { .. } => "MX",
            Self::NS { .. } => "NS",
            Self::PTR { .. } => "PTR",
            Self::SOA { .. } => "SOA",
            Self::SRV { .. } => "SRV",
            Self::TXT { .. } => "TXT",
            Self::SPF { .. } => "SPF",
            Self::NAPTR { .. } => "NAPTR",
            Self::CERT { .. } => "CERT",
            Self::DS { .. } => "DS",
            Self::LOC { .. } => "LOC",
            Self::SSHFP { .. } => "SSHFP",
            Self::TLSA { .. } => "TLSA",
            Self::Unknown { record_type, .. } => record_type,
        }
    }

    /// Provider-neutral field map of this rdata.
    pub fn to_map(&self) -> BTreeMap<String, Scalar> {
        match self {
            Self::A { address } | Self::AAAA { address } => {
                field_map([("address", address.as_str().into())])
            }
            Self::CNAME { cname } => field_map([("cname", cname.as_str().into())]),
            Self::MX {
                preference,
                exchange,
            } => field_map([
                ("preference", (*preference).into()),
                ("exchange", exchange.as_str().into()),
            ]),
            Self::NS { nsdname } => field_map([("nsdname", nsdname.as_str().into())]),
            Self::PTR { ptrdname } => field_map([("ptrdname", ptrdname.as_str().into())]),
            Self::SOA {
                mname,
                rname,
                serial,
                refresh,
                retry,
                expire,
                minimum,
            } => field_map([
                ("mname", mname.as_str().into()),
                ("rname", rname.as_str().into()),
                ("serial", (*serial).into()),
                ("refresh", (*refresh).into()),
                ("retry", (*retry).into()),
                ("expire", (*expire).into()),
                ("minimum", (*minimum).into()),
            ]),
            Self::SRV {
                priority,
                weight,
                port,
                target,
            } => field_map([
                ("priority", (*priority).into()),
                ("weight", (*weight).into()),
                ("port", (*port).into()),
                ("target", target.as_str().into()),
            ]),
            Self::TXT { txtdata } | Self::SPF { txtdata } => {
                field_map([("txtdata", txtdata.as_str().into())])
            }
            Self::NAPTR {
                order,
                preference,
                flags,
                services,
                regexp,
                replacement,
            } => field_map([
                ("order", (*order).into()),
                ("preference", (*preference).into()),
                ("flags", flags.as_str().into()),
                ("services", services.as_str().into()),
                ("regexp", regexp.as_str().into()),
                ("replacement", replacement.as_str().into()),
            ]),
            Self::CERT {
                format,
                tag,
                algorithm,
                certificate,
            } => field_map([
                ("format", (*format).into()),
                ("tag", (*tag).into()),
                ("algorithm", (*algorithm).into()),
                ("certificate", certificate.as_str().into()),
            ]),
            Self::DS {
                key_tag,
                algorithm_id,
                digest_id,
                digest,
            } => field_map([
                ("keyTag", (*key_tag).into()),
                ("algorithmId", (*algorithm_id).into()),
                ("digestId", (*digest_id).into()),
                ("digest", digest.as_str().into()),
            ]),
            Self::LOC {
                latitude,
                longitude,
                altitude,
                diameter,
                hprecision,
                vprecision,
            } => field_map([
                ("latitude", latitude.as_str().into()),
                ("longitude", longitude.as_str().into()),
                ("altitude", altitude.as_str().into()),
                ("diameter", diameter.as_str().into()),
                ("hprecision", hprecision.as_str().into()),
                ("vprecision", vprecision.as_str().into()),
            ]),
            Self::SSHFP {
                algorithm,
                fingerprint_type,
                fingerprint,
            } => field_map([
                ("algorithm", (*algorithm).into()),
                ("fingerprintType", (*fingerprint_type).into()),
                ("fingerprint", fingerprint.as_str().into()),
            ]),
            Self::TLSA {
                usage,
                selector,
                matching_type,
                certificate_association_data,
            } => field_map([
                ("usage", (*usage).into()),
                ("selector", (*selector).into()),
                ("matchingType", (*matching_type).into()),
                (
                    "certificateAssociationData",
                    certificate_association_data.as_str().into(),
                ),
            ]),
            Self::Unknown { fields, .. } => fields.clone(),
        }
    }

    /// Builds typed rdata from a field map, the inverse of [`to_map`](Self::to_map).
    ///
    /// Unrecognised types become [`RecordData::Unknown`]. Integer fields may be
    /// given as integers or as decimal text.
    pub fn from_map(record_type: &str, map: &BTreeMap<String, Scalar>) -> Result<Self> {
        let record_type = record_type.to_ascii_uppercase();
        let f = Fields {
            record_type: &record_type,
            map,
        };
        let data = match record_type.as_str() {
            "A" => Self::A {
                address: f.text("address")?,
            },
            "AAAA" => Self::AAAA {
                address: f.text("address")?,
            },
            "CNAME" => Self::CNAME {
                cname: f.text("cname")?,
            },
            "MX" => Self::MX {
                preference: f.int("preference")?,
                exchange: f.text("exchange")?,
            },
            "NS" => Self::NS {
                nsdname: f.text("nsdname")?,
            },
            "PTR" => Self::PTR {
                ptrdname: f.text("ptrdname")?,
            },
            "SOA" => Self::SOA {
                mname: f.text("mname")?,
                rname: f.text("rname")?,
                serial: f.int("serial")?,
                refresh: f.int("refresh")?,
                retry: f.int("retry")?,
                expire: f.int("expire")?,
                minimum: f.int("minimum")?,
            },
            "SRV" => Self::SRV {
                priority: f.int("priority")?,
                weight: f.int("weight")?,
                port: f.int("port")?,
                target: f.text("target")?,
            },
            "TXT" => Self::TXT {
                txtdata: f.text("txtdata")?,
            },
            "SPF" => Self::SPF {
                txtdata: f.text("txtdata")?,
            },
            "NAPTR" => Self::NAPTR {
                order: f.int("order")?,
                preference: f.int("preference")?,
                flags: f.text("flags")?,
                services: f.text("services")?,
                regexp: f.text("regexp")?,
                replacement: f.text("replacement")?,
            },
            "CERT" => Self::CERT {
                format: f.int("format")?,
                tag: f.int("tag")?,
                algorithm: f.int("algorithm")?,
                certificate: f.text("certificate")?,
            },
            "DS" => Self::DS {
                key_tag: f.int("keyTag")?,
                algorithm_id: f.int("algorithmId")?,
                digest_id: f.int("digestId")?,
                digest: f.text("digest")?,
            },
            "LOC" => Self::LOC {
                latitude: f.text("latitude")?,
                longitude: f.text("longitude")?,
                altitude: f.text("altitude")?,
                diameter: f.text("diameter")?,
                hprecision: f.text("hprecision")?,
                vprecision: f.text("vprecision")?,
            },
            "SSHFP" => Self::SSHFP {
                algorithm: f.int("algorithm")?,
                fingerprint_type: f.int("fingerprintType")?,
                fingerprint: f.text("fingerprint")?,
            },
            "TLSA" => Self::TLSA {
                usage: f.int("usage")?,
                selector: f.int("selector")?,
                matching_type: f.int("matchingType")?,
                certificate_association_data: f.text("certificateAssociationData")?,
            },
            _ => Self::Unknown {
                record_type,
                fields: map.clone(),
            },
        };
        Ok(data)
    }

    /// Parses zone-file presentation text (`"10 mail.example.com."` for MX).
    ///
    /// Character strings may be double-quoted with `\` escapes. Types this crate
    /// does not model are kept verbatim under the `rdata` key of
    /// [`RecordData::Unknown`].
    pub fn parse(record_type: &str, text: &str) -> Result<Self> {
        let record_type = record_type.to_ascii_uppercase();
        let text = text.trim();
        let data = match record_type.as_str() {
            "A" => Self::A {
                address: text.to_string(),
            },
            "AAAA" => Self::AAAA {
                address: text.to_string(),
            },
            "CNAME" => Self::CNAME {
                cname: text.to_string(),
            },
            "NS" => Self::NS {
                nsdname: text.to_string(),
            },
            "PTR" => Self::PTR {
                ptrdname: text.to_string(),
            },
            "TXT" => Self::TXT {
                txtdata: parse_character_data(&record_type, text)?,
            },
            "SPF" => Self::SPF {
                txtdata: parse_character_data(&record_type, text)?,
            },
            "MX" => {
                let mut t = Tokens::new(&record_type, text)?;
                let data = Self::MX {
                    preference: t.int("preference")?,
                    exchange: t.text("exchange")?,
                };
                t.finish(data)?
            }
            "SOA" => {
                let mut t = Tokens::new(&record_type, text)?;
                let data = Self::SOA {
                    mname: t.text("mname")?,
                    rname: t.text("rname")?,
                    serial: t.int("serial")?,
                    refresh: t.int("refresh")?,
                    retry: t.int("retry")?,
                    expire: t.int("expire")?,
                    minimum: t.int("minimum")?,
                };
                t.finish(data)?
            }
            "SRV" => {
                let mut t = Tokens::new(&record_type, text)?;
                let data = Self::SRV {
                    priority: t.int("priority")?,
                    weight: t.int("weight")?,
                    port: t.int("port")?,
                    target: t.text("target")?,
                };
                t.finish(data)?
            }
            "NAPTR" => {
                let mut t = Tokens::new(&record_type, text)?;
                let data = Self::NAPTR {
                    order: t.int("order")?,
                    preference: t.int("preference")?,
                    flags: t.text("flags")?,
                    services: t.text("services")?,
                    regexp: t.text("regexp")?,
                    replacement: t.text("replacement")?,
                };
                t.finish(data)?
            }
            "CERT" => {
                let mut t = Tokens::new(&record_type, text)?;
                Self::CERT {
                    format: t.int("format")?,
                    tag: t.int("tag")?,
                    algorithm: t.int("algorithm")?,
                    certificate: t.rest("certificate")?,
                }
            }
            "DS" => {
                let mut t = Tokens::new(&record_type, text)?;
                Self::DS {
                    key_tag: t.int("keyTag")?,
                    algorithm_id: t.int("algorithmId")?,
                    digest_id: t.int("digestId")?,
                    digest: t.rest("digest")?,
                }
            }
            "SSHFP" => {
                let mut t = Tokens::new(&record_type, text)?;
                Self::SSHFP {
                    algorithm: t.int("algorithm")?,
                    fingerprint_type: t.int("fingerprintType")?,
                    fingerprint: t.rest("fingerprint")?,
                }
            }
            "TLSA" => {
                let mut t = Tokens::new(&record_type, text)?;
                Self::TLSA {
                    usage: t.int("usage")?,
                    selector: t.int("selector")?,
                    matching_type: t.int("matchingType")?,
                    certificate_association_data: t.rest("certificateAssociationData")?,
                }
            }
            "LOC" => parse_loc(text)?,
            _ => Self::Unknown {
                fields: field_map([("rdata", text.into())]),
                record_type,
            },
        };
        Ok(data)
    }

    /// Checks the limits providers enforce on rdata.
    ///
    /// Names must be non-empty, at most [`MAX_NAME_LEN`] characters and free of
    /// whitespace. TXT/SPF data is limited to [`MAX_TEXT_LEN`] bytes, addresses
    /// must parse as IPv4/IPv6 and base64/hex data must be present.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::A { address } => {
                Ipv4Addr::from_str(address).map_err(|_| {
                    Error::invalid_argument(format!("A address '{address}' is not IPv4"))
                })?;
            }
            Self::AAAA { address } => {
                Ipv6Addr::from_str(address).map_err(|_| {
                    Error::invalid_argument(format!("AAAA address '{address}' is not IPv6"))
                })?;
            }
            Self::CNAME { cname } => check_name("CNAME", "cname", cname)?,
            Self::MX { exchange, .. } => check_name("MX", "exchange", exchange)?,
            Self::NS { nsdname } => check_name("NS", "nsdname", nsdname)?,
            Self::PTR { ptrdname } => check_name("PTR", "ptrdname", ptrdname)?,
            Self::SOA { mname, rname, .. } => {
                check_name("SOA", "mname", mname)?;
                check_name("SOA", "rname", rname)?;
            }
            Self::SRV { target, .. } => check_name("SRV", "target", target)?,
            Self::NAPTR { replacement, .. } => check_name("NAPTR", "replacement", replacement)?,
            Self::TXT { txtdata } | Self::SPF { txtdata } => {
                if txtdata.len() > MAX_TEXT_LEN {
                    return Err(Error::invalid_argument(format!(
                        "{} txtdata may not exceed {MAX_TEXT_LEN} bytes, was {}",
                        self.record_type(),
                        txtdata.len()
                    )));
                }
            }
            Self::CERT { certificate, .. } => check_present("CERT", "certificate", certificate)?,
            Self::DS { digest, .. } => check_present("DS", "digest", digest)?,
            Self::SSHFP { fingerprint, .. } => check_present("SSHFP", "fingerprint", fingerprint)?,
            Self::TLSA {
                certificate_association_data,
                ..
            } => check_present(
                "TLSA",
                "certificateAssociationData",
                certificate_association_data,
            )?,
            Self::LOC {
                latitude,
                longitude,
                altitude,
                ..
            } => {
                check_present("LOC", "latitude", latitude)?;
                check_present("LOC", "longitude", longitude)?;
                check_present("LOC", "altitude", altitude)?;
            }
            Self::Unknown { .. } => {}
        }
        Ok(())
    }

    /// The form [`parse`](Self::parse) yields for this rdata's presentation text.
    ///
    /// Names are trimmed, whitespace is dropped from base64/hex data, LOC
    /// coordinates are reduced to single-spaced words and missing LOC sizes take
    /// their defaults. Two rdata that print the same compare equal once
    /// canonical.
    #[must_use]
    pub fn canonical(self) -> Self {
        let trim = |s: String| s.trim().to_string();
        match self {
            Self::A { address } => Self::A {
                address: trim(address),
            },
            Self::AAAA { address } => Self::AAAA {
                address: trim(address),
            },
            Self::CNAME { cname } => Self::CNAME { cname: trim(cname) },
            Self::NS { nsdname } => Self::NS {
                nsdname: trim(nsdname),
            },
            Self::PTR { ptrdname } => Self::PTR {
                ptrdname: trim(ptrdname),
            },
            Self::MX {
                preference,
                exchange,
            } => Self::MX {
                preference,
                exchange: trim(exchange),
            },
            Self::SOA {
                mname,
                rname,
                serial,
                refresh,
                retry,
                expire,
                minimum,
            } => Self::SOA {
                mname: trim(mname),
                rname: trim(rname),
                serial,
                refresh,
                retry,
                expire,
                minimum,
            },
            Self::SRV {
                priority,
                weight,
                port,
                target,
            } => Self::SRV {
                priority,
                weight,
                port,
                target: trim(target),
            },
            Self::NAPTR {
                order,
                preference,
                flags,
                services,
                regexp,
                replacement,
            } => Self::NAPTR {
                order,
                preference,
                flags,
                services,
                regexp,
                replacement: trim(replacement),
            },
            Self::CERT {
                format,
                tag,
                algorithm,
                certificate,
            } => Self::CERT {
                format,
                tag,
                algorithm,
                certificate: squeeze(&certificate),
            },
            Self::DS {
                key_tag,
                algorithm_id,
                digest_id,
                digest,
            } => Self::DS {
                key_tag,
                algorithm_id,
                digest_id,
                digest: squeeze(&digest),
            },
            Self::SSHFP {
                algorithm,
                fingerprint_type,
                fingerprint,
            } => Self::SSHFP {
                algorithm,
                fingerprint_type,
                fingerprint: squeeze(&fingerprint),
            },
            Self::TLSA {
                usage,
                selector,
                matching_type,
                certificate_association_data,
            } => Self::TLSA {
                usage,
                selector,
                matching_type,
                certificate_association_data: squeeze(&certificate_association_data),
            },
            Self::LOC {
                latitude,
                longitude,
                altitude,
                diameter,
                hprecision,
                vprecision,
            } => {
                let [latitude, longitude, altitude, diameter, hprecision, vprecision] = loc_words([
                    &latitude,
                    &longitude,
                    &altitude,
                    &diameter,
                    &hprecision,
                    &vprecision,
                ]);
                Self::LOC {
                    latitude,
                    longitude,
                    altitude,
                    diameter,
                    hprecision,
                    vprecision,
                }
            }
            Self::Unknown {
                record_type,
                mut fields,
            } => {
                // parse keeps opaque text under a single `rdata` key, trimmed
                if fields.len() == 1
                    && let Some(Scalar::Text(rdata)) = fields.get_mut("rdata")
                {
                    *rdata = rdata.trim().to_string();
                }
                Self::Unknown {
                    record_type,
                    fields,
                }
            }
            data @ (Self::TXT { .. } | Self::SPF { .. }) => data,
        }
    }
}

impl fmt::Display for RecordData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A { address } | Self::AAAA { address } => f.write_str(address),
            Self::CNAME { cname } => f.write_str(cname),
            Self::NS { nsdname } => f.write_str(nsdname),
            Self::PTR { ptrdname } => f.write_str(ptrdname),
            Self::MX {
                preference,
                exchange,
            } => write!(f, "{preference} {exchange}"),
            Self::SOA {
                mname,
                rname,
                serial,
                refresh,
                retry,
                expire,
                minimum,
            } => write!(
                f,
                "{mname} {rname} {serial} {refresh} {retry} {expire} {minimum}"
            ),
            Self::SRV {
                priority,
                weight,
                port,
                target,
            } => write!(f, "{priority} {weight} {port} {target}"),
            Self::TXT { txtdata } | Self::SPF { txtdata } => f.write_str(&quote(txtdata)),
            Self::NAPTR {
                order,
                preference,
                flags,
                services,
                regexp,
                replacement,
            } => write!(
                f,
                "{order} {preference} {} {} {} {replacement}",
                quote(flags),
                quote(services),
                quote(regexp)
            ),
            Self::CERT {
                format,
                tag,
                algorithm,
                certificate,
            } => write!(f, "{format} {tag} {algorithm} {}", squeeze(certificate)),
            Self::DS {
                key_tag,
                algorithm_id,
                digest_id,
                digest,
            } => write!(f, "{key_tag} {algorithm_id} {digest_id} {}", squeeze(digest)),
            Self::LOC {
                latitude,
                longitude,
                altitude,
                diameter,
                hprecision,
                vprecision,
            } => f.write_str(
                &loc_words([
                    latitude, longitude, altitude, diameter, hprecision, vprecision,
                ])
                .join(" "),
            ),
            Self::SSHFP {
                algorithm,
                fingerprint_type,
                fingerprint,
            } => write!(f, "{algorithm} {fingerprint_type} {}", squeeze(fingerprint)),
            Self::TLSA {
                usage,
                selector,
                matching_type,
                certificate_association_data,
            } => write!(
                f,
                "{usage} {selector} {matching_type} {}",
                squeeze(certificate_association_data)
            ),
            Self::Unknown { fields, .. } => {
                let values: Vec<String> = fields.values().map(ToString::to_string).collect();
                f.write_str(&values.join(" "))
            }
        }
    }
}

fn check_name(record_type: &str, field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::invalid_argument(format!(
            "{record_type} {field} must not be empty"
        )));
    }
    if value.chars().count() > MAX_NAME_LEN {
        return Err(Error::invalid_argument(format!(
            "{record_type} {field} may not exceed {MAX_NAME_LEN} characters"
        )));
    }
    if value.chars().any(|c| c.is_whitespace() || c == '"') {
        return Err(Error::invalid_argument(format!(
            "{record_type} {field} '{value}' may not contain whitespace or quotes"
        )));
    }
    Ok(())
}

fn check_present(record_type: &str, field: &str, value: &str) -> Result<()> {
    if squeeze(value).is_empty() {
        return Err(Error::invalid_argument(format!(
            "{record_type} {field} must not be empty"
        )));
    }
    Ok(())
}

/// Base64/hex data with all whitespace removed.
fn squeeze(value: &str) -> String {
    value.split_whitespace().collect()
}

/// LOC fields as printed: coordinates single-spaced, the rest one word each,
/// missing sizes defaulted.
fn loc_words(fields: [&str; 6]) -> [String; 6] {
    let [latitude, longitude, altitude, diameter, hprecision, vprecision] = fields;
    let spaced = |s: &str| s.split_whitespace().collect::<Vec<_>>().join(" ");
    let sized = |s: &str, default: &str| {
        let word = squeeze(s);
        if word.is_empty() {
            default.to_string()
        } else {
            word
        }
    };
    [
        spaced(latitude),
        spaced(longitude),
        squeeze(altitude),
        sized(diameter, LOC_DEFAULT_SIZE),
        sized(hprecision, LOC_DEFAULT_HPRECISION),
        sized(vprecision, LOC_DEFAULT_VPRECISION),
    ]
}

/// Named lookups into a field map.
struct Fields<'a> {
    record_type: &'a str,
    map: &'a BTreeMap<String, Scalar>,
}

impl Fields<'_> {
    fn get(&self, key: &str) -> Result<&Scalar> {
        self.map.get(key).ok_or_else(|| {
            Error::invalid_argument(format!("{} rdata is missing '{key}'", self.record_type))
        })
    }

    fn text(&self, key: &str) -> Result<String> {
        Ok(self.get(key)?.to_string())
    }

    fn int<T: TryFrom<i64>>(&self, key: &str) -> Result<T> {
        let value = self.get(key)?;
        value
            .as_int()
            .and_then(|v| T::try_from(v).ok())
            .ok_or_else(|| {
                Error::invalid_argument(format!(
                    "{} rdata field '{key}' is not a valid integer: '{value}'",
                    self.record_type
                ))
            })
    }
}

/// Cursor over the whitespace/quote separated tokens of presentation text.
struct Tokens<'a> {
    record_type: &'a str,
    tokens: std::vec::IntoIter<String>,
}

impl<'a> Tokens<'a> {
    fn new(record_type: &'a str, text: &str) -> Result<Self> {
        let tokens = tokenize(text).map_err(|detail| {
            Error::invalid_argument(format!("{record_type} rdata '{text}': {detail}"))
        })?;
        Ok(Self {
            record_type,
            tokens: tokens.into_iter(),
        })
    }

    fn text(&mut self, field: &str) -> Result<String> {
        self.tokens.next().ok_or_else(|| {
            Error::invalid_argument(format!("{} rdata is missing '{field}'", self.record_type))
        })
    }

    fn int<T: FromStr>(&mut self, field: &str) -> Result<T> {
        let token = self.text(field)?;
        token.parse().map_err(|_| {
            Error::invalid_argument(format!(
                "{} rdata field '{field}' is not a valid integer: '{token}'",
                self.record_type
            ))
        })
    }

    /// Remaining tokens joined without separators (base64/hex split across words).
    fn rest(&mut self, field: &str) -> Result<String> {
        let rest: String = self.tokens.by_ref().collect();
        if rest.is_empty() {
            return Err(Error::invalid_argument(format!(
                "{} rdata is missing '{field}'",
                self.record_type
            )));
        }
        Ok(rest)
    }

    fn finish(mut self, data: RecordData) -> Result<RecordData> {
        match self.tokens.next() {
            None => Ok(data),
            Some(extra) => Err(Error::invalid_argument(format!(
                "{} rdata has unexpected trailing data '{extra}'",
                self.record_type
            ))),
        }
    }
}

/// Splits presentation text into tokens, honouring `"..."` with `\` escapes.
fn tokenize(text: &str) -> std::result::Result<Vec<String>, String> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();
    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }
        let mut token = String::new();
        if c == '"' {
            chars.next();
            let mut closed = false;
            while let Some(c) = chars.next() {
                match c {
                    '\\' => match chars.next() {
                        Some(escaped) => token.push(escaped),
                        None => return Err("dangling escape".to_string()),
                    },
                    '"' => {
                        closed = true;
                        break;
                    }
                    _ => token.push(c),
                }
            }
            if !closed {
                return Err("unterminated quoted string".to_string());
            }
        } else {
            while let Some(&c) = chars.peek() {
                if c.is_whitespace() {
                    break;
                }
                token.push(c);
                chars.next();
            }
        }
        tokens.push(token);
    }
    Ok(tokens)
}

fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// TXT/SPF text: quoted strings are concatenated, bare text is taken verbatim.
fn parse_character_data(record_type: &str, text: &str) -> Result<String> {
    if !text.starts_with('"') {
        return Ok(text.to_string());
    }
    tokenize(text)
        .map(|parts| parts.concat())
        .map_err(|detail| Error::invalid_argument(format!("{record_type} rdata: {detail}")))
}

/// `d [m [s]] {N|S} d [m [s]] {E|W} alt[m] [siz[m] [hp[m] [vp[m]]]]`
fn parse_loc(text: &str) -> Result<RecordData> {
    let words: Vec<&str> = text.split_whitespace().collect();
    let hemisphere = |from: usize, marks: [&str; 2]| {
        words[from..]
            .iter()
            .position(|w| marks.iter().any(|m| w.eq_ignore_ascii_case(m)))
            .map(|i| from + i)
    };
    let invalid = || Error::invalid_argument(format!("LOC rdata '{text}' is malformed"));

    let lat_end = hemisphere(0, ["N", "S"]).ok_or_else(invalid)?;
    let lon_end = hemisphere(lat_end + 1, ["E", "W"]).ok_or_else(invalid)?;
    let mut tail = words[lon_end + 1..].iter();
    let altitude = tail.next().ok_or_else(invalid)?;
    let diameter = tail.next().copied().unwrap_or(LOC_DEFAULT_SIZE);
    let hprecision = tail.next().copied().unwrap_or(LOC_DEFAULT_HPRECISION);
    let vprecision = tail.next().copied().unwrap_or(LOC_DEFAULT_VPRECISION);
    if tail.next().is_some() {
        return Err(invalid());
    }

    Ok(RecordData::LOC {
        latitude: words[..=lat_end].join(" "),
        longitude: words[lat_end + 1..=lon_end].join(" "),
        altitude: (*altitude).to_string(),
        diameter: diameter.to_string(),
        hprecision: hprecision.to_string(),
        vprecision: vprecision.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn a(address: &str) -> RecordData {
        RecordData::A {
            address: address.to_string(),
        }
    }

    #[test]
    fn map_keys_follow_record_type() {
        let keys = |d: &RecordData| d.to_map().into_keys().collect::<Vec<_>>();
        assert_eq!(keys(&a("192.0.2.1")), ["address"]);
        assert_eq!(
            keys(&RecordData::MX {
                preference: 10,
                exchange: "mx.example.com.".into()
            }),
            ["exchange", "preference"]
        );
        assert_eq!(
            keys(&RecordData::SRV {
                priority: 0,
                weight: 1,
                port: 80,
                target: "www.example.com.".into()
            }),
            ["port", "priority", "target", "weight"]
        );
    }

    #[test]
    fn map_numbers_are_integers() {
        let map = RecordData::MX {
            preference: 10,
            exchange: "mx.example.com.".into(),
        }
        .to_map();
        assert_eq!(map.get("preference"), Some(&Scalar::Int(10)));
    }

    #[test]
    fn from_map_accepts_numeric_text() {
        let map: BTreeMap<String, Scalar> = [
            ("exchange".to_string(), Scalar::from("mx.example.com.")),
            ("preference".to_string(), Scalar::from("20")),
        ]
        .into();
        let data = RecordData::from_map("mx", &map).unwrap();
        assert_eq!(
            data,
            RecordData::MX {
                preference: 20,
                exchange: "mx.example.com.".into()
            }
        );
    }

    #[test]
    fn from_map_rejects_missing_field() {
        let map: BTreeMap<String, Scalar> = [("port".to_string(), Scalar::Int(80))].into();
        let err = RecordData::from_map("SRV", &map).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)), "{err:?}");
    }

    #[test]
    fn from_map_rejects_out_of_range_integer() {
        let map: BTreeMap<String, Scalar> = [
            ("exchange".to_string(), Scalar::from("mx.example.com.")),
            ("preference".to_string(), Scalar::Int(70_000)),
        ]
        .into();
        assert!(RecordData::from_map("MX", &map).is_err());
    }

    #[test]
    fn from_map_unknown_type_keeps_fields() {
        let map: BTreeMap<String, Scalar> =
            [("flags".to_string(), Scalar::Int(0)), ("tag".to_string(), "issue".into())].into();
        let data = RecordData::from_map("caa", &map).unwrap();
        assert_eq!(data.record_type(), "CAA");
        assert_eq!(data.to_map(), map);
    }

    #[test]
    fn parse_mx_and_srv() {
        assert_eq!(
            RecordData::parse("MX", "10 mail.example.com.").unwrap(),
            RecordData::MX {
                preference: 10,
                exchange: "mail.example.com.".into()
            }
        );
        assert_eq!(
            RecordData::parse("SRV", "0 5 5060 sip.example.com.").unwrap(),
            RecordData::SRV {
                priority: 0,
                weight: 5,
                port: 5060,
                target: "sip.example.com.".into()
            }
        );
    }

    #[test]
    fn parse_rejects_trailing_tokens() {
        assert!(RecordData::parse("MX", "10 a.example.com. extra").is_err());
        assert!(RecordData::parse("MX", "ten a.example.com.").is_err());
    }

    #[test]
    fn parse_naptr_quoted_fields() {
        let data =
            RecordData::parse("NAPTR", r#"100 10 "U" "E2U+sip" "!^.*$!sip:info@example.com!" ."#)
                .unwrap();
        assert_eq!(
            data,
            RecordData::NAPTR {
                order: 100,
                preference: 10,
                flags: "U".into(),
                services: "E2U+sip".into(),
                regexp: "!^.*$!sip:info@example.com!".into(),
                replacement: ".".into(),
            }
        );
        assert_eq!(RecordData::parse("NAPTR", &data.to_string()).unwrap(), data);
    }

    #[test]
    fn parse_txt_quoted_and_bare() {
        assert_eq!(
            RecordData::parse("TXT", r#""v=spf1 " "-all""#).unwrap(),
            RecordData::TXT {
                txtdata: "v=spf1 -all".into()
            }
        );
        assert_eq!(
            RecordData::parse("TXT", "hello world").unwrap(),
            RecordData::TXT {
                txtdata: "hello world".into()
            }
        );
        let quoted = RecordData::TXT {
            txtdata: r#"say "hi""#.into(),
        };
        assert_eq!(RecordData::parse("TXT", &quoted.to_string()).unwrap(), quoted);
    }

    #[test]
    fn parse_loc_with_defaults() {
        let data = RecordData::parse("LOC", "37 46 30.000 N 122 23 30.000 W 0.00m").unwrap();
        assert_eq!(
            data,
            RecordData::LOC {
                latitude: "37 46 30.000 N".into(),
                longitude: "122 23 30.000 W".into(),
                altitude: "0.00m".into(),
                diameter: "1m".into(),
                hprecision: "10000m".into(),
                vprecision: "10m".into(),
            }
        );
        assert!(RecordData::parse("LOC", "37 N 122").is_err());
    }

    #[test]
    fn parse_ds_joins_split_digest() {
        let data = RecordData::parse("DS", "60485 5 1 2BB183AF5F225 88179A53B0A98").unwrap();
        assert_eq!(
            data,
            RecordData::DS {
                key_tag: 60485,
                algorithm_id: 5,
                digest_id: 1,
                digest: "2BB183AF5F22588179A53B0A98".into(),
            }
        );
    }

    #[test]
    fn parse_unknown_type_is_opaque() {
        let data = RecordData::parse("HINFO", "\"PC\" \"Linux\"").unwrap();
        assert_eq!(data.record_type(), "HINFO");
        assert_eq!(data.to_string(), "\"PC\" \"Linux\"");
    }

    #[test]
    fn validate_addresses() {
        assert!(a("192.0.2.1").validate().is_ok());
        assert!(a("2001:db8::1").validate().is_err());
        assert!(
            RecordData::AAAA {
                address: "2001:DB8::1".into()
            }
            .validate()
            .is_ok()
        );
    }

    #[test]
    fn validate_name_limit() {
        let long = format!("{}.example.com.", "a".repeat(250));
        let err = RecordData::CNAME { cname: long }.validate().unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert!(
            RecordData::CNAME {
                cname: String::new()
            }
            .validate()
            .is_err()
        );
    }

    #[test]
    fn validate_text_limit() {
        let ok = RecordData::TXT {
            txtdata: "x".repeat(MAX_TEXT_LEN),
        };
        assert!(ok.validate().is_ok());
        let too_long = RecordData::SPF {
            txtdata: "x".repeat(MAX_TEXT_LEN + 1),
        };
        assert!(too_long.validate().is_err());
    }

    #[test]
    fn scalar_rejects_floats() {
        let res: serde_json::Result<Scalar> = serde_json::from_str("1.5");
        assert!(res.is_err());
        let int: Scalar = serde_json::from_str("42").unwrap();
        assert_eq!(int, Scalar::Int(42));
    }

    #[test]
    fn printed_form_parses_to_canonical() {
        let samples = [
            a(" 192.0.2.1"),
            RecordData::AAAA {
                address: "2001:db8::1".into(),
            },
            RecordData::CNAME {
                cname: "www.example.com. ".into(),
            },
            RecordData::MX {
                preference: 10,
                exchange: "mx.example.com.".into(),
            },
            RecordData::NS {
                nsdname: "ns1.example.com.".into(),
            },
            RecordData::PTR {
                ptrdname: "host.example.com.".into(),
            },
            RecordData::SOA {
                mname: "ns1.example.com.".into(),
                rname: "admin.example.com.".into(),
                serial: 2024010101,
                refresh: 7200,
                retry: 900,
                expire: 1209600,
                minimum: 300,
            },
            RecordData::SRV {
                priority: 0,
                weight: 5,
                port: 5060,
                target: "sip.example.com.".into(),
            },
            RecordData::TXT {
                txtdata: "  padded \"text\"  ".into(),
            },
            RecordData::SPF {
                txtdata: "v=spf1 -all".into(),
            },
            RecordData::NAPTR {
                order: 100,
                preference: 10,
                flags: String::new(),
                services: "E2U+sip".into(),
                regexp: "!^.*$!sip:info@example.com!".into(),
                replacement: ".".into(),
            },
            RecordData::CERT {
                format: 1,
                tag: 12345,
                algorithm: 8,
                certificate: "MIIB AAAA\tBBBB".into(),
            },
            RecordData::DS {
                key_tag: 60485,
                algorithm_id: 5,
                digest_id: 1,
                digest: "2BB183AF5F225 88179A53B0A98".into(),
            },
            RecordData::LOC {
                latitude: "37  46 30.000 N".into(),
                longitude: "122 23  30.000 W".into(),
                altitude: "0.00m".into(),
                diameter: String::new(),
                hprecision: " 100m".into(),
                vprecision: String::new(),
            },
            RecordData::SSHFP {
                algorithm: 1,
                fingerprint_type: 1,
                fingerprint: "123456789abcdef6 7890123456789abcdef67890".into(),
            },
            RecordData::TLSA {
                usage: 3,
                selector: 1,
                matching_type: 1,
                certificate_association_data: "0D6FCE13 243AA7".into(),
            },
        ];
        for data in samples {
            let printed = data.to_string();
            let parsed = RecordData::parse(data.record_type(), &printed).unwrap();
            let canonical = data.clone().canonical();
            assert_eq!(parsed, canonical, "{printed}");
            assert_eq!(
                RecordData::parse(data.record_type(), &parsed.to_string()).unwrap(),
                parsed
            );
            assert_eq!(canonical.clone().canonical(), canonical);
        }
    }

    #[test]
    fn canonical_loc_fills_default_sizes() {
        let loc = RecordData::LOC {
            latitude: "52 22 23.000 N".into(),
            longitude: "4 53 32.000 E".into(),
            altitude: "-2.00m".into(),
            diameter: String::new(),
            hprecision: String::new(),
            vprecision: String::new(),
        };
        assert_eq!(
            loc.canonical().to_map().get("hprecision"),
            Some(&Scalar::from("10000m"))
        );
    }

    #[test]
    fn canonical_trims_opaque_rdata() {
        let data = RecordData::Unknown {
            record_type: "HINFO".into(),
            fields: field_map([("rdata", " \"PC\" \"Linux\" ".into())]),
        };
        let parsed = RecordData::parse("HINFO", &data.to_string()).unwrap();
        assert_eq!(parsed, data.canonical());
    }

    #[test]
    fn validate_rejects_unprintable_names_and_missing_data() {
        let spaced = RecordData::MX {
            preference: 10,
            exchange: "mail example.com.".into(),
        };
        assert!(spaced.validate().is_err());
        let quoted = RecordData::NS {
            nsdname: "\"ns1.example.com.\"".into(),
        };
        assert!(quoted.validate().is_err());
        let blank = RecordData::DS {
            key_tag: 1,
            algorithm_id: 8,
            digest_id: 2,
            digest: "   ".into(),
        };
        assert!(blank.validate().is_err());
    }

    #[test]
    fn serde_roundtrip_tagged() {
        let data = RecordData::SSHFP {
            algorithm: 1,
            fingerprint_type: 1,
            fingerprint: "123456789abcdef67890123456789abcdef67890".into(),
        };
        let json = serde_json::to_string(&data).unwrap();
        assert!(json.contains("\"type\":\"SSHFP\""));
        assert!(json.contains("\"fingerprintType\":1"));
        let back: RecordData = serde_json::from_str(&json).unwrap();
        assert_eq!(back, data);
    }
}
