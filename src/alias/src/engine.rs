//! Alias resolution engine
//!
//! Orchestrates the recursion guard, the map chain, privilege resolution,
//! and owner delegation, then hands the expansion to the token dispatcher.
//!
//! # Pipeline
//!
//! ```text
//! LocalState → RecursionGuard → MapChain → PrivilegeResolver → OwnershipDelegator → TokenDispatcher
//!                  ↓                ↓               ↓                    ↓
//!            [not alias/bounce] [deferred]      [deferred]          [deferred]
//! ```
//!
//! Every frame and every set of user attributes is derived, never mutated in
//! place, so a nested expansion cannot leak rights or owner attributes back
//! into its caller or its siblings.

use crate::chain::{ChainMatch, MapChain};
use crate::config::AliasConfig;
use crate::dispatch::TokenDispatcher;
use crate::error::Result;
use crate::guard::{GuardVerdict, RecursionGuard};
use crate::metrics::{MetricsCollector, ResolverMetrics};
use crate::ownership::OwnershipDelegator;
use crate::privilege::{Privilege, PrivilegeResolver};
use crate::tables::TableRegistry;
use localmail_core::{
    AccountDirectory, Canonicalizer, ExpansionType, LocalState, Resolution, StatusRecorder,
    UserAttr,
};
use once_cell::sync::OnceCell;
use std::sync::Arc;
use tracing::{debug, warn};

/// External stages the engine delegates to
#[derive(Clone)]
pub struct Collaborators {
    /// Maps table owner ids to accounts
    pub directory: Arc<dyn AccountDirectory>,

    /// Canonicalizes `owner-` addresses
    pub canonicalizer: Arc<dyn Canonicalizer>,

    /// Writes deferred, bounced, and discarded records
    pub recorder: Arc<dyn StatusRecorder>,

    /// Delivers the destinations listed in an expansion
    pub dispatcher: Arc<dyn TokenDispatcher>,
}

/// Resolves local recipients through the alias map chain
pub struct AliasResolver {
    config: AliasConfig,

    /// Opens tables when the chain is first needed
    registry: TableRegistry,

    /// Built on first use, read-only afterwards
    chain: OnceCell<MapChain>,

    guard: RecursionGuard,
    privilege: PrivilegeResolver,
    ownership: OwnershipDelegator,
    recorder: Arc<dyn StatusRecorder>,
    dispatcher: Arc<dyn TokenDispatcher>,
    metrics: MetricsCollector,
}

impl AliasResolver {
    /// Create a resolver; the map chain is built on the first resolution
    pub fn new(config: AliasConfig, registry: TableRegistry, collaborators: Collaborators) -> Self {
        Self {
            guard: RecursionGuard::new(config.max_expansion_depth),
            privilege: PrivilegeResolver::new(collaborators.directory),
            ownership: OwnershipDelegator::new(
                config.owner_request_special,
                collaborators.canonicalizer,
            ),
            recorder: collaborators.recorder,
            dispatcher: collaborators.dispatcher,
            metrics: MetricsCollector::new(),
            chain: OnceCell::new(),
            registry,
            config,
        }
    }

    /// Engine configuration
    pub fn config(&self) -> &AliasConfig {
        &self.config
    }

    /// The map chain, building it on first call
    pub fn chain(&self) -> Result<&MapChain> {
        self.chain
            .get_or_try_init(|| MapChain::build(&self.config.alias_maps, &self.registry))
    }

    /// Resolver counters
    pub fn metrics(&self) -> ResolverMetrics {
        self.metrics.snapshot()
    }

    /// Resolve one recipient
    ///
    /// `state` is the caller's frame; its level is the caller's depth and is
    /// incremented by one for this call. Returns [`Resolution::NotAlias`] when
    /// the caller should continue with plain user delivery, otherwise the
    /// status of the handled recipient. `Err` is reserved for conditions that
    /// must abort delivery altogether.
    pub fn resolve(&self, state: &LocalState, attr: &UserAttr) -> Result<Resolution> {
        let mut frame = state.clone();
        frame.level = frame.level.saturating_add(1);
        debug!("resolve[{}]: {}", frame.level, frame.local);
        self.metrics.record_resolution();

        match self.guard.check(&frame) {
            GuardVerdict::Proceed => {}
            GuardVerdict::SelfReference => {
                debug!("{}: alias names itself, delivering to user", frame.local);
                self.metrics.record_self_reference();
                return Ok(Resolution::NotAlias);
            }
            GuardVerdict::DepthExceeded => {
                let reason = format!("possible alias database loop for {}", frame.local);
                warn!("{}", reason);
                self.metrics.record_bounced();
                return Ok(Resolution::Handled(self.recorder.bounce(&frame, &reason)));
            }
        }

        let chain = self.chain()?;
        frame.exp_from = Some(frame.local.clone());

        let found = match chain.find(&frame.local) {
            Ok(found) => found,
            Err(e) => {
                warn!("alias database unavailable: {}", e);
                return Ok(self.defer(&frame, "alias database unavailable"));
            }
        };

        if let Some(found) = found {
            self.metrics.record_alias_hit();
            return self.expand(frame, attr, chain, found);
        }

        if self.config.is_reserved(&frame.local) {
            warn!("required alias not found: {}", frame.local);
            self.metrics.record_discarded();
            return Ok(Resolution::Handled(self.recorder.discard(&frame)));
        }

        self.metrics.record_not_alias();
        Ok(Resolution::NotAlias)
    }

    /// Deliver a matched expansion under the rights and owner it implies
    fn expand(
        &self,
        mut frame: LocalState,
        attr: &UserAttr,
        chain: &MapChain,
        found: ChainMatch,
    ) -> Result<Resolution> {
        frame.exp_type = ExpansionType::Alias;

        let attr = match self.privilege.resolve(found.table.as_ref(), attr, frame.level)? {
            Privilege::Granted(attr) => attr,
            Privilege::UnknownOwner(uid) => {
                warn!(
                    "cannot find alias database owner for {} (uid {})",
                    found.table.name(),
                    uid
                );
                return Ok(self.defer(&frame, "cannot find alias database owner"));
            }
        };

        let mut frame = match self.ownership.resolve(&frame, chain) {
            Ok(frame) => frame,
            Err(e) => {
                warn!("alias database unavailable: {}", e);
                return Ok(self.defer(&frame, "alias database unavailable"));
            }
        };

        frame.delivered = Some(frame.recipient.clone());

        let status = self
            .dispatcher
            .deliver(self, &frame, &attr, &found.expansion)?;

        Ok(Resolution::Handled(status))
    }

    fn defer(&self, frame: &LocalState, reason: &str) -> Resolution {
        self.metrics.record_deferred();
        Resolution::Handled(self.recorder.defer(frame, reason))
    }
}
