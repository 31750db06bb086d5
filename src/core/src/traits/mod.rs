//! Collaborator capability traits
//!
//! Each trait is a seam to an external stage: table backends, the identity
//! directory, address canonicalization, and delivery status records.

pub mod table;
pub mod directory;
pub mod canonical;
pub mod recorder;

// Re-export commonly used traits
pub use table::AliasTable;
pub use directory::AccountDirectory;
pub use canonical::Canonicalizer;
pub use recorder::StatusRecorder;
