//! Delivery status recording trait

use crate::types::{DeliveryStatus, LocalState};

/// Records terminal outcomes for a recipient
///
/// Each call writes one record and returns the status the caller reports
/// upward. The alias engine never inspects a record after writing it.
pub trait StatusRecorder: Send + Sync {
    /// Record a delivery that must be retried later
    fn defer(&self, state: &LocalState, reason: &str) -> DeliveryStatus;

    /// Record a permanent delivery failure
    fn bounce(&self, state: &LocalState, reason: &str) -> DeliveryStatus;

    /// Record an intentionally discarded message
    fn discard(&self, state: &LocalState) -> DeliveryStatus;
}
