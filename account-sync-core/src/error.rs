//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

// Re-export library error type
pub use account_sync_provider::ApiError;

/// Core layer error type
#[derive(Error, Debug, Clone, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// Credential store failure (the store itself failed, not "no token found")
    #[error("Credential error: {0}")]
    CredentialError(String),

    /// Data store failure
    #[error("Storage error: {0}")]
    StorageError(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// The persisted account metadata exists but cannot be parsed
    #[error("Persisted account metadata is corrupt: {0}")]
    CorruptMetadata(String),

    /// A network refresh was requested for an account without a token
    #[error("Account {login}@{endpoint} has no token")]
    MissingToken { login: String, endpoint: String },

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Remote API error (converting from library)
    #[error("{0}")]
    Api(#[from] ApiError),
}

impl CoreError {
    /// Whether it is expected behavior (user input, revoked token, etc.), used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// **Please update this method simultaneously when new variants are added. **
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::ValidationError(_) => true,
            Self::Api(e) => e.is_expected(),
            _ => false,
        }
    }

    /// Whether the error is a programming-logic violation.
    ///
    /// Fatal errors are never absorbed by the fall-back paths of add/refresh.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::MissingToken { .. } | Self::CorruptMetadata(_))
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;
