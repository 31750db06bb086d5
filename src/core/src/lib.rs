//! # localmail core
//!
//! Shared delivery types, collaborator traits, and error handling for the
//! local delivery agent. The alias engine and any other delivery stage build
//! on these without depending on each other.

pub mod types;
pub mod traits;
pub mod error;

// Re-export commonly used types
pub use error::{CoreError, Result};
pub use types::{
    Account, DeliveryRights, DeliveryStatus, ExpansionType, LocalState, Resolution, UserAttr,
};
pub use traits::{AccountDirectory, AliasTable, Canonicalizer, StatusRecorder};

/// Numeric owner identity of a table or account
pub type Uid = u32;

/// Numeric group identity
pub type Gid = u32;

/// The superuser identity
pub const ROOT_UID: Uid = 0;
