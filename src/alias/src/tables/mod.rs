//! Alias table backends and the registry that opens them
//!
//! Tables are named by `type:name` specifications. The registry resolves a
//! specification to a handle once, when the map chain is built:
//!
//! - `memory:<name>` tables are registered up front by the host
//! - `json:<path>` tables are opened from a JSON object file
//!
//! Any handle can also be registered under its full specification, which is
//! how hosts plug in their own [`AliasTable`] implementations.

mod memory;
mod json;

pub use memory::InMemoryTable;
pub use json::JsonFileTable;

use crate::error::{AliasError, Result};
use localmail_core::{AliasTable, CoreError};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Parsed `type:name` table specification
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableSpec {
    /// Backend kind (`memory`, `json`, ...)
    pub kind: String,
    /// Backend-specific table name or path
    pub name: String,
}

impl TableSpec {
    /// Create a specification from its parts
    pub fn new(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            name: name.into(),
        }
    }
}

impl FromStr for TableSpec {
    type Err = AliasError;

    fn from_str(s: &str) -> Result<Self> {
        let (kind, name) = s
            .split_once(':')
            .ok_or_else(|| AliasError::Config(format!("need type:name table, got '{}'", s)))?;

        let (kind, name) = (kind.trim(), name.trim());
        if kind.is_empty() || name.is_empty() {
            return Err(AliasError::Config(format!(
                "empty type or name in table '{}'",
                s
            )));
        }

        Ok(Self::new(kind, name))
    }
}

impl fmt::Display for TableSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.name)
    }
}

/// Opens table handles from specifications
#[derive(Default)]
pub struct TableRegistry {
    /// Pre-registered handles, keyed by full specification
    handles: HashMap<String, Arc<dyn AliasTable>>,
}

impl TableRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an in-memory table under `memory:<name>`
    pub fn register_memory(&mut self, table: InMemoryTable) -> Arc<InMemoryTable> {
        let table = Arc::new(table);
        self.handles
            .insert(table.name().to_string(), table.clone() as Arc<dyn AliasTable>);
        table
    }

    /// Register any table handle under its own specification
    pub fn register(&mut self, table: Arc<dyn AliasTable>) {
        self.handles.insert(table.name().to_string(), table);
    }

    /// Open the table named by a specification
    pub fn open(&self, spec: &TableSpec) -> Result<Arc<dyn AliasTable>> {
        if let Some(handle) = self.handles.get(&spec.to_string()) {
            return Ok(handle.clone());
        }

        match spec.kind.as_str() {
            "json" => Ok(Arc::new(JsonFileTable::new(&spec.name))),
            _ => Err(CoreError::unknown_table(spec.to_string()).into()),
        }
    }
}
