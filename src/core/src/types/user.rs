//! Delivery rights and account records

use crate::{Gid, Uid};
use serde::{Deserialize, Serialize};

/// Account record from the identity directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Login name
    pub name: String,

    /// Numeric user id
    pub uid: Uid,

    /// Primary group id
    pub gid: Gid,

    /// Home directory
    pub home: String,

    /// Login shell
    pub shell: String,
}

impl Account {
    /// Create a new account record
    pub fn new(name: impl Into<String>, uid: Uid, gid: Gid) -> Self {
        let name = name.into();
        Self {
            home: format!("/home/{}", name),
            shell: "/bin/sh".to_string(),
            name,
            uid,
            gid,
        }
    }

    /// Set the home directory
    pub fn with_home(mut self, home: impl Into<String>) -> Self {
        self.home = home.into();
        self
    }

    /// Set the login shell
    pub fn with_shell(mut self, shell: impl Into<String>) -> Self {
        self.shell = shell.into();
        self
    }
}

/// Identity that `|command` and `/file/name` deliveries run as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DeliveryRights {
    /// The process-wide default delivery identity (`default_privs`)
    Default,
    /// A specific account
    Account { uid: Uid, gid: Gid },
}

/// User attributes: delivery rights plus the environment that goes with them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAttr {
    /// Rights for command and file deliveries
    pub rights: DeliveryRights,

    /// Login name of the rights holder
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logname: Option<String>,

    /// Home directory of the rights holder
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home: Option<String>,

    /// Shell of the rights holder
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shell: Option<String>,

    /// Recursion level that last set these attributes
    pub level: u32,
}

impl UserAttr {
    /// Attributes with default rights and no environment
    pub fn new() -> Self {
        Self {
            rights: DeliveryRights::Default,
            logname: None,
            home: None,
            shell: None,
            level: 0,
        }
    }

    /// Derive attributes carrying an account's rights, scoped to `level`
    pub fn for_account(&self, account: &Account, level: u32) -> Self {
        Self {
            rights: DeliveryRights::Account {
                uid: account.uid,
                gid: account.gid,
            },
            logname: Some(account.name.clone()),
            home: Some(account.home.clone()),
            shell: Some(account.shell.clone()),
            level,
        }
    }

    /// Derive attributes reset to default rights, scoped to `level`
    pub fn reset(&self, level: u32) -> Self {
        Self {
            level,
            ..Self::new()
        }
    }

    /// Whether these attributes carry the default identity
    pub fn has_default_rights(&self) -> bool {
        self.rights == DeliveryRights::Default
    }
}

impl Default for UserAttr {
    fn default() -> Self {
        Self::new()
    }
}
