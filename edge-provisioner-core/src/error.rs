//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

// Re-export library error type
pub use edge_provisioner_provider::ProviderError;

/// Core layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// The target domain has no registered-domain suffix
    #[error("Invalid domain '{0}': expected at least one '.' separator")]
    InvalidDomain(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Stack state persistence error
    #[error("State error: {0}")]
    StateError(String),

    /// Control-plane error (converted from library)
    #[error("{0}")]
    Provider(#[from] ProviderError),
}

impl CoreError {
    /// Whether it is expected behavior (bad input, missing external
    /// configuration, etc.), used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error`
    /// when returning `false`.
    /// **Please update this method simultaneously when new variants are
    /// added.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::InvalidDomain(_) | Self::ValidationError(_) => true,
            Self::Provider(e) => e.is_expected(),
            Self::StateError(_) => false,
        }
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;
