//! Local delivery configuration loading and validation

use crate::guard::DEFAULT_MAX_DEPTH;
use crate::tables::TableSpec;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Complete configuration file
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LocalConfig {
    #[serde(default)]
    pub aliases: AliasConfig,

    #[serde(default)]
    pub identity: IdentityConfig,
}

/// Alias engine settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AliasConfig {
    /// Ordered `type:name` table specifications
    #[serde(default)]
    pub alias_maps: Vec<String>,

    /// Route problem reports to `owner-<name>` when that alias exists
    #[serde(default = "default_true")]
    pub owner_request_special: bool,

    /// Nesting ceiling for recursive expansion
    #[serde(default = "default_max_depth")]
    pub max_expansion_depth: u32,

    /// Names that are discarded with a warning when no alias exists
    #[serde(default = "default_reserved_names")]
    pub reserved_names: Vec<String>,

    /// Account that stands for the default delivery rights
    #[serde(default = "default_privs")]
    pub default_privs: String,
}

impl Default for AliasConfig {
    fn default() -> Self {
        Self {
            alias_maps: Vec::new(),
            owner_request_special: default_true(),
            max_expansion_depth: default_max_depth(),
            reserved_names: default_reserved_names(),
            default_privs: default_privs(),
        }
    }
}

impl AliasConfig {
    /// Whether `local` is a reserved name (case-insensitive)
    pub fn is_reserved(&self, local: &str) -> bool {
        self.reserved_names
            .iter()
            .any(|name| name.eq_ignore_ascii_case(local))
    }

    /// Parsed table specifications, in order
    pub fn table_specs(&self) -> crate::error::Result<Vec<TableSpec>> {
        self.alias_maps.iter().map(|spec| spec.parse()).collect()
    }
}

/// Identity and addressing settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IdentityConfig {
    /// passwd(5) file used as the identity directory
    #[serde(default = "default_passwd_file")]
    pub passwd_file: PathBuf,

    /// Domain appended to unqualified addresses
    #[serde(default = "default_myorigin")]
    pub myorigin: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            passwd_file: default_passwd_file(),
            myorigin: default_myorigin(),
        }
    }
}

// Default value functions
fn default_true() -> bool { true }
fn default_max_depth() -> u32 { DEFAULT_MAX_DEPTH }
fn default_reserved_names() -> Vec<String> {
    vec!["mailer-daemon".to_string(), "postmaster".to_string()]
}
fn default_privs() -> String { "nobody".to_string() }
fn default_passwd_file() -> PathBuf { PathBuf::from("/etc/passwd") }
fn default_myorigin() -> String { "localhost".to_string() }

impl LocalConfig {
    /// Load configuration from TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())
            .context("Failed to read configuration file")?;
        Self::from_toml(&contents)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: LocalConfig = toml::from_str(contents)
            .context("Failed to parse configuration file")?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.aliases.max_expansion_depth == 0 {
            anyhow::bail!("max_expansion_depth must be at least 1");
        }

        if self.aliases.default_privs.is_empty() {
            anyhow::bail!("default_privs must name an account");
        }

        if self.identity.myorigin.is_empty() {
            anyhow::bail!("myorigin must not be empty");
        }

        self.aliases
            .table_specs()
            .context("Invalid alias_maps entry")?;

        Ok(())
    }

    /// Check that every alias map can be opened from its specification alone
    ///
    /// `memory:` tables only exist when a host registers them, so a
    /// standalone process can serve `json:` tables only.
    pub fn require_file_tables(&self) -> Result<()> {
        for spec in self.aliases.table_specs()? {
            if spec.kind != "json" {
                anyhow::bail!(
                    "alias map {} cannot be opened from a configuration file; use json:<path>",
                    spec
                );
            }
        }

        Ok(())
    }
}
