//! Ordered alias map chain
//!
//! The chain is the authoritative precedence order: for any key, the first
//! table that holds it wins and later tables are never consulted. A storage
//! error in any table stops the walk at that table.

use crate::error::Result;
use crate::tables::{TableRegistry, TableSpec};
use localmail_core::AliasTable;
use std::sync::Arc;
use tracing::{debug, info};

/// A successful chain lookup
#[derive(Clone)]
pub struct ChainMatch {
    /// Table that produced the match
    pub table: Arc<dyn AliasTable>,
    /// Raw expansion text, possibly empty
    pub expansion: String,
}

impl std::fmt::Debug for ChainMatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainMatch")
            .field("table", &self.table.name())
            .field("expansion", &self.expansion)
            .finish()
    }
}

/// Ordered, immutable sequence of alias tables
pub struct MapChain {
    tables: Vec<Arc<dyn AliasTable>>,
}

impl MapChain {
    /// Build a chain from `type:name` specifications, in order
    pub fn build(specs: &[String], registry: &TableRegistry) -> Result<Self> {
        let mut tables = Vec::with_capacity(specs.len());

        for spec in specs {
            let spec: TableSpec = spec.parse()?;
            tables.push(registry.open(&spec)?);
        }

        info!("Alias map chain built with {} tables", tables.len());

        Ok(Self { tables })
    }

    /// Build a chain from already opened tables
    pub fn from_tables(tables: Vec<Arc<dyn AliasTable>>) -> Self {
        Self { tables }
    }

    /// Tables in precedence order
    pub fn tables(&self) -> &[Arc<dyn AliasTable>] {
        &self.tables
    }

    /// Number of tables
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Whether the chain has no tables
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Find the first table holding `key`
    ///
    /// Returns `Ok(None)` only when every table answered "absent".
    pub fn find(&self, key: &str) -> localmail_core::Result<Option<ChainMatch>> {
        for table in &self.tables {
            match table.lookup(key)? {
                Some(expansion) => {
                    debug!("{}: {} = {}", table.name(), key, expansion);
                    return Ok(Some(ChainMatch {
                        table: table.clone(),
                        expansion,
                    }));
                }
                None => {
                    debug!("{}: {} not found", table.name(), key);
                }
            }
        }

        Ok(None)
    }
}
