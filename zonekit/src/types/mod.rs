//! Provider-neutral model: zones, record sets, rdata, profiles, provider
//! metadata and the page types exchanged with providers.

mod credentials;
mod metadata;
mod page;
mod profile;
mod rdata;
mod rrset;
mod zone;

pub use credentials::{CredentialValidationError, Credentials};
pub use metadata::{
    FieldType, ProviderCredentialField, ProviderLimits, ProviderMetadata, RecordOrdering,
};
pub use page::{ChangeSet, NativeRecord, Page, RecordFilter};
pub use profile::{Geo, Profile, Weighted};
pub use rdata::{MAX_NAME_LEN, MAX_TEXT_LEN, RecordData, Scalar};
pub use rrset::{Builder, MAX_TTL, ResourceRecordSet};
pub use zone::Zone;
