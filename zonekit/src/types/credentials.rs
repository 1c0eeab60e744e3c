use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::metadata::{ProviderCredentialField, ProviderMetadata};

/// Validation error for provider credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CredentialValidationError {
    /// The provider needs credentials but none were given.
    Missing {
        /// Which provider the error relates to.
        provider: String,
    },
    /// A credential part is present but empty/whitespace-only.
    EmptyField {
        /// Which provider the error relates to.
        provider: String,
        /// Machine-readable field key.
        field: String,
        /// Human-readable field label.
        label: String,
    },
    /// The credentials match none of the shapes the provider accepts.
    IncorrectShape {
        /// Which provider the error relates to.
        provider: String,
        /// Accepted shapes, one `type: [key, ...]` entry per credential type.
        expected: Vec<String>,
    },
}

impl std::fmt::Display for CredentialValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing { provider } => write!(f, "no credentials supplied for {provider}"),
            Self::EmptyField { label, .. } => write!(f, "Field must not be empty: {label}"),
            Self::IncorrectShape { provider, expected } => write!(
                f,
                "incorrect credentials supplied for {provider}, expected one of {}",
                expected.join("; ")
            ),
        }
    }
}

impl std::error::Error for CredentialValidationError {}

/// Credentials as supplied by the caller, before validation.
///
/// # Serialization
///
/// Untagged: `null` is anonymous, a JSON array gives the parts in order, a
/// JSON object names them:
///
/// ```json
/// { "accessKey": "AKIA...", "secretKey": "..." }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Credentials {
    #[default]
    Anonymous,
    /// Parts in the positional order of a credential type.
    Ordered(Vec<String>),
    /// Parts by key.
    Named(BTreeMap<String, String>),
}

impl Credentials {
    /// Matches these credentials against the shapes `metadata` accepts and
    /// returns them keyed by field key.
    ///
    /// Providers without credential types accept anything and get an empty
    /// map. Ordered parts match the first credential type with the same
    /// arity; named parts match the first type whose keys are all present.
    pub fn validate(
        &self,
        metadata: &ProviderMetadata,
    ) -> Result<BTreeMap<String, String>, CredentialValidationError> {
        if metadata.is_anonymous() {
            return Ok(BTreeMap::new());
        }
        let provider = &metadata.name;
        let shapes = &metadata.credential_types;

        let matched: Option<(&[ProviderCredentialField], Vec<&str>)> = match self {
            Self::Anonymous => {
                return Err(CredentialValidationError::Missing {
                    provider: provider.clone(),
                });
            }
            Self::Ordered(parts) => shapes
                .values()
                .find(|fields| fields.len() == parts.len())
                .map(|fields| (fields.as_slice(), parts.iter().map(String::as_str).collect())),
            Self::Named(map) => shapes.values().find_map(|fields| {
                fields
                    .iter()
                    .map(|f| map.get(&f.key).map(String::as_str))
                    .collect::<Option<Vec<_>>>()
                    .map(|values| (fields.as_slice(), values))
            }),
        };

        let Some((fields, values)) = matched else {
            return Err(CredentialValidationError::IncorrectShape {
                provider: provider.clone(),
                expected: describe_shapes(metadata),
            });
        };

        fields
            .iter()
            .zip(values)
            .map(|(field, value)| {
                if value.trim().is_empty() {
                    Err(CredentialValidationError::EmptyField {
                        provider: provider.clone(),
                        field: field.key.clone(),
                        label: field.label.clone(),
                    })
                } else {
                    Ok((field.key.clone(), value.to_string()))
                }
            })
            .collect()
    }
}

fn describe_shapes(metadata: &ProviderMetadata) -> Vec<String> {
    metadata
        .credential_types
        .iter()
        .map(|(kind, fields)| {
            let keys: Vec<&str> = fields.iter().map(|f| f.key.as_str()).collect();
            format!("{kind}: [{}]", keys.join(", "))
        })
        .collect()
}
