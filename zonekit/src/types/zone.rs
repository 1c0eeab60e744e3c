use serde::{Deserialize, Serialize};

use super::rdata::MAX_NAME_LEN;
use crate::error::{Error, Result};

/// A DNS zone as known to a provider.
///
/// `id` is only set by providers that allow several zones with the same name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Zone {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
}

impl Zone {
    /// Zone without a provider id. A missing trailing dot is appended.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        Ok(Self {
            name: Self::checked_name(name.into())?,
            id: None,
        })
    }

    pub fn with_id(name: impl Into<String>, id: impl Into<String>) -> Result<Self> {
        Ok(Self {
            name: Self::checked_name(name.into())?,
            id: Some(id.into()),
        })
    }

    fn checked_name(mut name: String) -> Result<String> {
        if name.is_empty() {
            return Err(Error::invalid_argument("zone name must not be empty"));
        }
        if !name.ends_with('.') {
            name.push('.');
        }
        if name.chars().count() > MAX_NAME_LEN {
            return Err(Error::invalid_argument(format!(
                "zone name may not exceed {MAX_NAME_LEN} characters: {name}"
            )));
        }
        Ok(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// The provider handle for this zone: its id when present, else its name.
    pub fn id_or_name(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.name)
    }
}
