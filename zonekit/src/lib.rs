//! # zonekit
//!
//! Provider-agnostic management of DNS zones and resource record sets.
//!
//! Each DNS backend implements the small [`DnsProvider`] trait (page
//! through zones and flat records, create and delete records). On top of it
//! the crate offers:
//!
//! - a canonical [`ResourceRecordSet`] with typed [`RecordData`] and optional
//!   [`Geo`] / [`Weighted`] visibility profiles;
//! - a [`GroupingIterator`] that lazily turns a paged, flat record listing
//!   into record sets, merging across page boundaries;
//! - an idempotent desired-state `put` that diffs against the current set and
//!   sends only the minimal change ([`plan_changes`]);
//! - zone and record-set APIs bundled in [`DnsApi`].
//!
//! ## Feature Flags
//!
//! - **`all-providers`** *(default)*: enable every provider listed below.
//! - **`memory`**: the in-memory [`MemoryProvider`].
//!
//! ## Usage
//!
//! ```rust,no_run
//! use zonekit::{create_provider, Credentials, DnsApi, RecordData, ResourceRecordSet, Zone};
//!
//! fn main() -> zonekit::Result<()> {
//!     let api = DnsApi::new(create_provider("memory", &Credentials::Anonymous)?);
//!     let zone = api.zones().put(&Zone::new("example.com")?)?;
//!
//!     let rrsets = api.basic_record_sets_in_zone(zone.id_or_name());
//!     let mx = ResourceRecordSet::builder()
//!         .name("example.com.")
//!         .rtype("MX")
//!         .ttl(3600)
//!         .add(RecordData::MX { preference: 10, exchange: "mx1.example.com.".into() })
//!         .add(RecordData::MX { preference: 20, exchange: "mx2.example.com.".into() })
//!         .build()?;
//!     rrsets.put(&mx)?;
//!
//!     for rrset in rrsets.iter()? {
//!         let rrset = rrset?;
//!         println!("{} {} {:?}", rrset.name(), rrset.rtype(), rrset.records());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Operations return [`Result<T, Error>`](Error):
//!
//! - [`Error::InvalidArgument`]: malformed record set, rdata over its limits, or
//!   a zone that does not exist
//! - [`Error::CredentialValidation`]: credentials of the wrong shape
//! - [`Error::Provider`]: a [`ProviderError`] from the backend, unchanged
//!
//! Absence is never an error: lookups return `Ok(None)` and deletes of absent
//! sets succeed.

mod error;
mod factory;
mod grouping;
mod providers;
mod services;
mod traits;
mod types;
mod utils;

// Re-export error types
pub use error::{Error, ProviderError, ProviderResult, Result};

// Re-export registry and factory functions
pub use factory::{
    ProviderConfig, ProviderConstructor, ProviderEntry, ProviderRegistry, create_provider,
    get_all_provider_metadata,
};

// Re-export the provider trait and grouping
pub use grouping::{GroupingIterator, PageFetcher, RDataConverter};
pub use traits::DnsProvider;

// Re-export APIs
pub use services::{
    AllProfileResourceRecordSetApi, DnsApi, GeoProfile, GeoResourceRecordSetApi, ProfileKind,
    ProfileResourceRecordSetApi, RecordSetIter, ResourceRecordSetApi, WeightedProfile,
    WeightedResourceRecordSetApi, ZoneApi, ZoneIterator, plan_changes,
};

// Re-export types
pub use types::{
    Builder, ChangeSet, CredentialValidationError, Credentials, FieldType, Geo, MAX_NAME_LEN,
    MAX_TEXT_LEN, MAX_TTL, NativeRecord, Page, Profile, ProviderCredentialField, ProviderLimits,
    ProviderMetadata, RecordData, RecordFilter, RecordOrdering, ResourceRecordSet, Scalar,
    Weighted, Zone,
};

// Re-export utils
pub use utils::log_sanitizer;
pub use utils::names::{absolute_name, relative_name};

// Re-export concrete providers (behind feature flags)
#[cfg(feature = "memory")]
pub use providers::{MemoryProvider, MemoryProviderBuilder};
