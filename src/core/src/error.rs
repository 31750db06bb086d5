//! Error types shared by the delivery stages
//!
//! Recoverable delivery problems are reported as delivery statuses, not as
//! errors. `CoreError` covers collaborator failures that a stage has to
//! classify before it decides what status to record.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error type for local delivery collaborators
#[derive(Debug, Error)]
pub enum CoreError {
    /// A table lookup failed at the storage layer
    #[error("Table {table} unavailable: {reason}")]
    TableUnavailable { table: String, reason: String },

    /// A table handle could not be found or opened
    #[error("Unknown table: {0}")]
    UnknownTable(String),
}

impl CoreError {
    /// Create a table unavailable error
    pub fn table_unavailable<T: Into<String>, S: Into<String>>(table: T, reason: S) -> Self {
        CoreError::TableUnavailable {
            table: table.into(),
            reason: reason.into(),
        }
    }

    /// Create an unknown table error
    pub fn unknown_table<S: Into<String>>(msg: S) -> Self {
        CoreError::UnknownTable(msg.into())
    }
}
