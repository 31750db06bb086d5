//! Identity directory implementations

use crate::error::Result;
use localmail_core::{Account, AccountDirectory, Uid};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// Identity directory held in memory
pub struct InMemoryDirectory {
    accounts: RwLock<HashMap<Uid, Account>>,
}

impl InMemoryDirectory {
    /// Create an empty directory
    pub fn new() -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
        }
    }

    /// Add an account while building the directory
    pub fn with_account(self, account: Account) -> Self {
        self.insert(account);
        self
    }

    /// Insert or replace an account
    pub fn insert(&self, account: Account) {
        self.accounts.write().insert(account.uid, account);
    }

    /// Number of accounts
    pub fn len(&self) -> usize {
        self.accounts.read().len()
    }

    /// Whether the directory has no accounts
    pub fn is_empty(&self) -> bool {
        self.accounts.read().is_empty()
    }
}

impl Default for InMemoryDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl AccountDirectory for InMemoryDirectory {
    fn find_by_uid(&self, uid: Uid) -> Option<Account> {
        self.accounts.read().get(&uid).cloned()
    }

    fn find_by_name(&self, name: &str) -> Option<Account> {
        self.accounts
            .read()
            .values()
            .find(|account| account.name == name)
            .cloned()
    }
}

/// Identity directory read from a passwd(5) file
///
/// Lines are `name:password:uid:gid:gecos:home:shell`. Comments, blank and
/// malformed lines are skipped. When several lines share a uid, the first
/// one wins, as with getpwuid().
pub struct PasswdDirectory {
    accounts: Vec<Account>,
}

impl PasswdDirectory {
    /// Load a passwd file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Ok(Self::parse(&contents))
    }

    /// Parse passwd file contents
    pub fn parse(contents: &str) -> Self {
        let accounts = contents
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty() && !line.starts_with('#'))
            .filter_map(|(index, line)| {
                let account = Self::parse_line(line);
                if account.is_none() {
                    debug!("passwd line {}: malformed entry skipped", index + 1);
                }
                account
            })
            .collect();

        Self { accounts }
    }

    fn parse_line(line: &str) -> Option<Account> {
        let fields: Vec<&str> = line.split(':').collect();
        if fields.len() != 7 || fields[0].is_empty() {
            return None;
        }

        let uid = fields[2].parse().ok()?;
        let gid = fields[3].parse().ok()?;

        Some(
            Account::new(fields[0], uid, gid)
                .with_home(fields[5])
                .with_shell(fields[6]),
        )
    }

    /// All parsed accounts, in file order
    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }
}

impl AccountDirectory for PasswdDirectory {
    fn find_by_uid(&self, uid: Uid) -> Option<Account> {
        self.accounts.iter().find(|account| account.uid == uid).cloned()
    }

    fn find_by_name(&self, name: &str) -> Option<Account> {
        self.accounts.iter().find(|account| account.name == name).cloned()
    }
}
