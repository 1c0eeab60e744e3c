use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::CredentialValidationError;

/// Failure reported by a [`DnsProvider`](crate::DnsProvider) primitive.
///
/// Every variant names the provider that produced it. The core never retries,
/// classifies or rewraps these values: they reach the caller unchanged inside
/// [`Error::Provider`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "code")]
pub enum ProviderError {
    /// The zone addressed by a call does not exist at the provider.
    #[error("[{provider}] Zone '{zone}' not found")]
    ZoneNotFound {
        /// Provider that produced the error.
        provider: String,
        /// Zone name or id that was not found.
        zone: String,
    },

    /// A zone with the same name already exists and the provider does not
    /// support duplicate zone names.
    #[error("[{provider}] Zone '{zone}' already exists")]
    ZoneExists {
        /// Provider that produced the error.
        provider: String,
        /// Conflicting zone name.
        zone: String,
    },

    /// The provider cannot store records of this type.
    #[error("[{provider}] Unsupported record type: {record_type}")]
    UnsupportedRecordType {
        /// Provider that produced the error.
        provider: String,
        /// The unsupported record type mnemonic.
        record_type: String,
    },

    /// The provider rejected the supplied credentials.
    #[error("[{provider}] Invalid credentials")]
    InvalidCredentials {
        /// Provider that produced the error.
        provider: String,
    },

    /// Native record data could not be turned into [`RecordData`](crate::RecordData).
    #[error("[{provider}] Parse error: {detail}")]
    ParseError {
        /// Provider that produced the error.
        provider: String,
        /// Details about the parse failure.
        detail: String,
    },

    /// The request never produced a usable answer (connection refused, timeout,
    /// cancelled context, ...). Retry policy belongs to the transport.
    #[error("[{provider}] Transport error: {detail}")]
    Transport {
        /// Provider that produced the error.
        provider: String,
        /// Error details.
        detail: String,
    },
}

impl ProviderError {
    /// Whether this is expected behaviour (bad input, missing resource), used to
    /// pick the log level: `warn` when `true`, `error` otherwise.
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::ZoneNotFound { .. }
                | Self::ZoneExists { .. }
                | Self::UnsupportedRecordType { .. }
                | Self::InvalidCredentials { .. }
        )
    }

    /// Shortcut for [`ProviderError::ParseError`].
    pub fn parse(provider: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::ParseError {
            provider: provider.into(),
            detail: detail.into(),
        }
    }
}

/// Crate-level error type.
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum Error {
    /// Malformed input: an invalid record set, an rdata value over its limits,
    /// or a zone that does not exist.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// No provider with this name is registered.
    #[error("Provider not found: {0}")]
    ProviderNotFound(String),

    /// Credentials do not match any shape the provider accepts.
    #[error("{0}")]
    CredentialValidation(#[from] CredentialValidationError),

    /// Failure from a provider primitive, passed through untouched.
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl Error {
    /// Shortcut for [`Error::InvalidArgument`].
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// See [`ProviderError::is_expected`].
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::InvalidArgument(_)
            | Self::ProviderNotFound(_)
            | Self::CredentialValidation(_) => true,
            Self::Provider(e) => e.is_expected(),
        }
    }
}

/// Convenience alias for crate operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Convenience alias for provider primitives.
pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_zone_not_found() {
        let e = ProviderError::ZoneNotFound {
            provider: "memory".to_string(),
            zone: "example.com.".to_string(),
        };
        assert_eq!(e.to_string(), "[memory] Zone 'example.com.' not found");
    }

    #[test]
    fn display_transport() {
        let e = ProviderError::Transport {
            provider: "route53".to_string(),
            detail: "connection reset".to_string(),
        };
        assert_eq!(e.to_string(), "[route53] Transport error: connection reset");
    }

    #[test]
    fn provider_error_passes_through_verbatim() {
        let inner = ProviderError::Transport {
            provider: "t".to_string(),
            detail: "deadline exceeded".to_string(),
        };
        let outer = Error::from(inner.clone());
        assert_eq!(outer.to_string(), inner.to_string());
        assert!(matches!(outer, Error::Provider(ref e) if *e == inner));
    }

    #[test]
    fn expected_classification() {
        assert!(Error::invalid_argument("rrset was empty").is_expected());
        assert!(
            !Error::Provider(ProviderError::Transport {
                provider: "t".into(),
                detail: "x".into(),
            })
            .is_expected()
        );
        assert!(
            Error::Provider(ProviderError::ZoneNotFound {
                provider: "t".into(),
                zone: "z.".into(),
            })
            .is_expected()
        );
    }

    #[test]
    fn serialize_tagged_code() {
        let e = ProviderError::UnsupportedRecordType {
            provider: "t".into(),
            record_type: "LOC".into(),
        };
        let json = serde_json::to_string(&e).unwrap();
        assert!(json.contains("\"code\":\"UnsupportedRecordType\""));
        let back: ProviderError = serde_json::from_str(&json).unwrap();
        assert_eq!(back, e);
    }
}
