//! # localmail alias engine
//!
//! Resolves local recipient names through an ordered chain of alias tables
//! and drives re-delivery of the expansion.
//!
//! ## Features
//!
//! - **Ordered map chain**, built once on first use; the first table holding
//!   a key wins and a table error stops the walk
//! - **Recursion guard** bounding expansion depth, with sendmail-compatible
//!   handling of aliases that list their own name
//! - **Delivery rights** taken from the alias database owner, never from root
//! - **Owner delegation** through `owner-<name>` aliases
//! - **Status classification** into deferred, bounced, and discarded records
//!
//! ## Example
//!
//! ```rust
//! use localmail_alias::{
//!     AliasConfig, AliasResolver, Collaborators, ExpansionPlanner, InMemoryDirectory,
//!     InMemoryTable, OriginCanonicalizer, RecordLog, TableRegistry,
//! };
//! use localmail_core::{LocalState, Resolution, UserAttr};
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut registry = TableRegistry::new();
//! registry.register_memory(InMemoryTable::new("aliases").with_entry("root", "alice"));
//!
//! let config = AliasConfig {
//!     alias_maps: vec!["memory:aliases".to_string()],
//!     ..Default::default()
//! };
//! let planner = Arc::new(ExpansionPlanner::new("example.com", "nobody"));
//! let resolver = AliasResolver::new(
//!     config,
//!     registry,
//!     Collaborators {
//!         directory: Arc::new(InMemoryDirectory::new()),
//!         canonicalizer: Arc::new(OriginCanonicalizer::new("example.com")),
//!         recorder: Arc::new(RecordLog::new()),
//!         dispatcher: planner.clone(),
//!     },
//! );
//!
//! let state = LocalState::top_level("1A2B3C", "root@example.com", "root", "");
//! let resolution = resolver.resolve(&state, &UserAttr::new())?;
//! assert!(resolution.is_handled());
//! assert_eq!(planner.deliveries().len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod config;
pub mod tables;
pub mod chain;
pub mod directory;
pub mod canonical;
pub mod records;
pub mod guard;
pub mod privilege;
pub mod ownership;
pub mod engine;
pub mod dispatch;
pub mod metrics;

// Re-export commonly used types
pub use error::{AliasError, Result};
pub use config::{AliasConfig, IdentityConfig, LocalConfig};
pub use tables::{InMemoryTable, JsonFileTable, TableRegistry, TableSpec};
pub use chain::MapChain;
pub use directory::{InMemoryDirectory, PasswdDirectory};
pub use canonical::OriginCanonicalizer;
pub use records::{DeliveryRecord, RecordKind, RecordLog};
pub use guard::{GuardVerdict, RecursionGuard, DEFAULT_MAX_DEPTH};
pub use privilege::{Privilege, PrivilegeResolver};
pub use ownership::OwnershipDelegator;
pub use engine::{AliasResolver, Collaborators};
pub use dispatch::{Destination, ExpansionPlanner, PlannedDelivery, TokenDispatcher};
pub use metrics::{MetricsCollector, ResolverMetrics};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
