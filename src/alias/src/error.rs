//! Error types for the alias engine
//!
//! Only unrecoverable conditions surface as `AliasError`. Everything the
//! queue can act on is recorded and returned as a delivery status.

use localmail_core::CoreError;
use thiserror::Error;

/// Alias engine errors
#[derive(Debug, Error)]
pub enum AliasError {
    /// Collaborator error that could not be classified as a delivery status
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The owner of a matched table's storage could not be determined
    #[error("Cannot stat alias database {table}: {source}")]
    OwnerUnavailable {
        table: String,
        #[source]
        source: std::io::Error,
    },

    /// Invalid table specification or engine configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for alias engine operations
pub type Result<T> = std::result::Result<T, AliasError>;
