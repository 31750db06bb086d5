//! Delivery rights for alias expansions
//!
//! Rights follow the owner of the alias database, not the recipient name,
//! so an unprivileged user's own alias table cannot borrow another account's
//! rights. Root-owned tables deliver with the default identity instead of
//! root's.

use crate::error::{AliasError, Result};
use localmail_core::{AccountDirectory, AliasTable, Uid, UserAttr, ROOT_UID};
use std::sync::Arc;
use tracing::debug;

/// Outcome of privilege resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Privilege {
    /// Attributes to use for this expansion's sub-deliveries
    Granted(UserAttr),
    /// The table owner has no account in the identity directory
    UnknownOwner(Uid),
}

/// Derives delivery rights from a table's owning identity
pub struct PrivilegeResolver {
    directory: Arc<dyn AccountDirectory>,
}

impl PrivilegeResolver {
    /// Create a resolver over an identity directory
    pub fn new(directory: Arc<dyn AccountDirectory>) -> Self {
        Self { directory }
    }

    /// Resolve the rights for an expansion produced by `table`
    ///
    /// The caller's attributes are never modified; the result is a new value
    /// scoped to `level`. Failure to stat the table's storage is fatal.
    pub fn resolve(&self, table: &dyn AliasTable, attr: &UserAttr, level: u32) -> Result<Privilege> {
        let uid = table.owner_uid().map_err(|source| AliasError::OwnerUnavailable {
            table: table.name().to_string(),
            source,
        })?;

        if uid == ROOT_UID {
            debug!("{}: root-owned, using default rights", table.name());
            return Ok(Privilege::Granted(attr.reset(level)));
        }

        match self.directory.find_by_uid(uid) {
            Some(account) => {
                debug!("{}: rights of {} (uid {})", table.name(), account.name, uid);
                Ok(Privilege::Granted(attr.for_account(&account, level)))
            }
            None => Ok(Privilege::UnknownOwner(uid)),
        }
    }
}
