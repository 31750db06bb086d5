//! Resolver counters for observability

use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;

/// Snapshot of resolver activity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolverMetrics {
    /// Total calls into the resolver
    pub resolutions: u64,

    /// Recipients found in the map chain
    pub alias_hits: u64,

    /// Recipients handed back for plain user delivery
    pub not_alias: u64,

    /// Aliases that named their own origin
    pub self_references: u64,

    /// Deferred outcomes recorded by the resolver
    pub deferred: u64,

    /// Bounced outcomes recorded by the resolver
    pub bounced: u64,

    /// Reserved names discarded for lack of an alias
    pub discarded: u64,
}

impl ResolverMetrics {
    /// Fraction of resolutions that matched an alias
    pub fn hit_rate(&self) -> f64 {
        if self.resolutions == 0 {
            0.0
        } else {
            self.alias_hits as f64 / self.resolutions as f64
        }
    }
}

/// Collects resolver counters
#[derive(Debug, Clone, Default)]
pub struct MetricsCollector {
    metrics: Arc<Mutex<ResolverMetrics>>,
}

impl MetricsCollector {
    /// Create a new collector
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_resolution(&self) {
        self.metrics.lock().resolutions += 1;
    }

    pub fn record_alias_hit(&self) {
        self.metrics.lock().alias_hits += 1;
    }

    pub fn record_not_alias(&self) {
        self.metrics.lock().not_alias += 1;
    }

    pub fn record_self_reference(&self) {
        let mut metrics = self.metrics.lock();
        metrics.self_references += 1;
        metrics.not_alias += 1;
    }

    pub fn record_deferred(&self) {
        self.metrics.lock().deferred += 1;
    }

    pub fn record_bounced(&self) {
        self.metrics.lock().bounced += 1;
    }

    pub fn record_discarded(&self) {
        self.metrics.lock().discarded += 1;
    }

    /// Current counters
    pub fn snapshot(&self) -> ResolverMetrics {
        self.metrics.lock().clone()
    }

    /// Reset all counters
    pub fn reset(&self) {
        *self.metrics.lock() = ResolverMetrics::default();
    }
}
