//! Owner delegation through `owner-<name>` aliases
//!
//! Aliases meant for a group route delivery problem reports to a designated
//! owner. When `owner-<name>` exists anywhere in the map chain, it becomes
//! both the sender and the owner attribute of the expansion. Otherwise the
//! owner attribute is cleared: the alias is globally visible and problems go
//! back to the original sender.

use crate::chain::MapChain;
use localmail_core::{Canonicalizer, LocalState};
use std::sync::Arc;
use tracing::debug;

/// Decides who is notified about delivery problems for an expansion
pub struct OwnershipDelegator {
    enabled: bool,
    canonicalizer: Arc<dyn Canonicalizer>,
}

impl OwnershipDelegator {
    /// Create a delegator; `enabled` mirrors `owner_request_special`
    pub fn new(enabled: bool, canonicalizer: Arc<dyn Canonicalizer>) -> Self {
        Self {
            enabled,
            canonicalizer,
        }
    }

    /// Derive the frame whose sender and owner attributes apply to the
    /// expansion of `state.local`
    ///
    /// The `owner-` lookup is a separate walk of the chain. A storage error
    /// during that walk is returned to the caller.
    pub fn resolve(&self, state: &LocalState, chain: &MapChain) -> localmail_core::Result<LocalState> {
        let mut frame = state.clone();

        if !self.enabled {
            frame.owner = None;
            return Ok(frame);
        }

        let owner = format!("owner-{}", state.local);
        match chain.find(&owner)? {
            Some(_) => {
                let canonical = self.canonicalizer.canonicalize(&owner);
                debug!("{}: owner delegated to {}", state.local, canonical);
                frame.sender = canonical.clone();
                frame.owner = Some(canonical);
            }
            None => {
                frame.owner = None;
            }
        }

        Ok(frame)
    }
}
