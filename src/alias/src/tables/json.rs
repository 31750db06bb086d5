//! JSON file alias table

use localmail_core::{AliasTable, CoreError, Result, Uid};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Entries and owner captured from one open of the backing file
struct Snapshot {
    entries: HashMap<String, String>,
    owner: Uid,
}

/// Alias table backed by a JSON object file: `{"name": "expansion", ...}`
///
/// The file is read on first use. A file that cannot be read or parsed is a
/// lookup error, never an empty table, and the load is retried on the next
/// lookup. The owner is taken from the same open handle the entries were read
/// from, so replacing or removing the file after the load changes neither.
pub struct JsonFileTable {
    spec: String,
    path: PathBuf,
    snapshot: RwLock<Option<Snapshot>>,
}

impl JsonFileTable {
    /// Create a table over a JSON file, addressed as `json:<path>`
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        Self {
            spec: format!("json:{}", path.display()),
            path,
            snapshot: RwLock::new(None),
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Drop the loaded snapshot so the next lookup re-reads the file
    pub fn reload(&self) {
        *self.snapshot.write() = None;
    }

    fn with_snapshot<T>(&self, f: impl FnOnce(&Snapshot) -> T) -> Result<T> {
        if let Some(snapshot) = self.snapshot.read().as_ref() {
            return Ok(f(snapshot));
        }

        let snapshot = self.load()?;
        let result = f(&snapshot);
        *self.snapshot.write() = Some(snapshot);

        Ok(result)
    }

    fn load(&self) -> Result<Snapshot> {
        let unavailable = |e: std::io::Error| CoreError::table_unavailable(&self.spec, e.to_string());

        let mut file = File::open(&self.path).map_err(unavailable)?;
        let owner = file_owner(&file).map_err(unavailable)?;

        let mut contents = String::new();
        file.read_to_string(&mut contents).map_err(unavailable)?;

        let raw: HashMap<String, String> = serde_json::from_str(&contents)
            .map_err(|e| CoreError::table_unavailable(&self.spec, e.to_string()))?;

        debug!("{}: loaded {} entries, owner uid {}", self.spec, raw.len(), owner);

        Ok(Snapshot {
            entries: raw
                .into_iter()
                .map(|(key, value)| (key.to_lowercase(), value))
                .collect(),
            owner,
        })
    }
}

#[cfg(unix)]
fn file_owner(file: &File) -> std::io::Result<Uid> {
    use std::os::unix::fs::MetadataExt;

    Ok(file.metadata()?.uid())
}

#[cfg(not(unix))]
fn file_owner(file: &File) -> std::io::Result<Uid> {
    file.metadata().map(|_| localmail_core::ROOT_UID)
}

impl AliasTable for JsonFileTable {
    fn name(&self) -> &str {
        &self.spec
    }

    fn lookup(&self, key: &str) -> Result<Option<String>> {
        let key = key.to_lowercase();
        self.with_snapshot(|snapshot| snapshot.entries.get(&key).cloned())
    }

    fn owner_uid(&self) -> std::io::Result<Uid> {
        self.with_snapshot(|snapshot| snapshot.owner)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))
    }
}
