//! Identity directory trait

use crate::types::Account;
use crate::Uid;

/// Maps numeric owner ids to account records
pub trait AccountDirectory: Send + Sync {
    /// Find the account that owns a uid
    fn find_by_uid(&self, uid: Uid) -> Option<Account>;

    /// Find an account by login name
    fn find_by_name(&self, name: &str) -> Option<Account>;
}
