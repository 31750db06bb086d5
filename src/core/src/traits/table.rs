//! Alias table backend trait

use crate::error::Result;
use crate::Uid;

/// One alias table: ordered key lookup over a named dictionary
///
/// `lookup` distinguishes "no such key" (`Ok(None)`) from a storage-layer
/// failure (`Err`), because the two lead to different delivery decisions.
pub trait AliasTable: Send + Sync {
    /// Table specification as configured, e.g. `json:/etc/localmail/aliases.json`
    fn name(&self) -> &str;

    /// Look up the raw expansion text for a key
    fn lookup(&self, key: &str) -> Result<Option<String>>;

    /// Identity that owns the storage backing this table
    ///
    /// Tables with no backing storage report the superuser.
    fn owner_uid(&self) -> std::io::Result<Uid>;
}
