//! In-memory alias table

use localmail_core::{AliasTable, Result, Uid, ROOT_UID};
use parking_lot::RwLock;
use std::collections::HashMap;

/// Alias table held in memory
///
/// Keys are folded to lower case on insert and lookup. A table without an
/// explicit owner has no backing storage and is treated as root-owned.
pub struct InMemoryTable {
    spec: String,
    entries: RwLock<HashMap<String, String>>,
    owner: Option<Uid>,
}

impl InMemoryTable {
    /// Create an empty table, addressed as `memory:<name>`
    pub fn new(name: &str) -> Self {
        Self {
            spec: format!("memory:{}", name),
            entries: RwLock::new(HashMap::new()),
            owner: None,
        }
    }

    /// Attribute the table to an owning uid
    pub fn with_owner(mut self, uid: Uid) -> Self {
        self.owner = Some(uid);
        self
    }

    /// Add an entry while building the table
    pub fn with_entry(self, key: &str, expansion: &str) -> Self {
        self.insert(key, expansion);
        self
    }

    /// Insert or replace an entry
    pub fn insert(&self, key: &str, expansion: &str) {
        self.entries
            .write()
            .insert(key.to_lowercase(), expansion.to_string());
    }

    /// Remove an entry
    pub fn remove(&self, key: &str) -> Option<String> {
        self.entries.write().remove(&key.to_lowercase())
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the table has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl AliasTable for InMemoryTable {
    fn name(&self) -> &str {
        &self.spec
    }

    fn lookup(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().get(&key.to_lowercase()).cloned())
    }

    fn owner_uid(&self) -> std::io::Result<Uid> {
        Ok(self.owner.unwrap_or(ROOT_UID))
    }
}
