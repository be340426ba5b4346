//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

// Re-export library error type
pub use twin_scanner_provider::ProviderError;

/// Core layer error type
///
/// Remote failures never surface here during scan/fetch/describe; the provider
/// boundary folds them into data. These variants cover input guards, registry
/// construction, export and configuration.
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// Blank domain passed to an operation that needs one
    #[error("No domain given")]
    EmptyDomain,

    /// Export requested with no attribute selected
    #[error("No attributes selected")]
    NoAttributesSelected,

    /// Export requested but the fetch produced nothing to export
    #[error("Nothing to export for domain: {0}")]
    EmptyResult(String),

    /// Display name not present in the registry
    #[error("Unknown attribute: {0}")]
    UnknownAttribute(String),

    /// Two registrations fold to the same display name
    #[error("Duplicate attribute: {0}")]
    DuplicateAttribute(String),

    /// A newer batch replaced this one before it completed
    #[error("Batch {0} was superseded by a newer batch")]
    BatchSuperseded(u64),

    /// serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Configuration could not be read or parsed
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Export artifact could not be persisted
    #[error("Storage error: {0}")]
    StorageError(String),

    /// Provider error (converting from library)
    #[error("{0}")]
    Provider(#[from] ProviderError),
}

impl CoreError {
    /// Whether it is expected behavior (user input, empty result, etc.) is used for log classification.
    ///
    /// `true` → user-facing warning at `warn` level, `false` → `error` level.
    /// **Please update this method when new variants are added.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::EmptyDomain
            | Self::NoAttributesSelected
            | Self::EmptyResult(_)
            | Self::UnknownAttribute(_)
            | Self::BatchSuperseded(_) => true,
            Self::Provider(e) => e.is_expected(),
            _ => false,
        }
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;
