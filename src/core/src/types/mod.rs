//! Shared types for local delivery

pub mod state;
pub mod user;
pub mod status;

// Re-export commonly used types
pub use state::{ExpansionType, LocalState};
pub use user::{Account, DeliveryRights, UserAttr};
pub use status::{DeliveryStatus, Resolution};
