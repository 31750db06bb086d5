//! Delivery outcomes

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of a handled recipient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    /// Delivered, or intentionally discarded
    Ok,
    /// Try again later
    Deferred,
    /// Permanent failure, recorded for the sender
    Bounced,
}

impl DeliveryStatus {
    /// Combine the statuses of sibling deliveries
    ///
    /// A deferral outranks a bounce, which outranks success: the queue has to
    /// retry if any sibling asked for it.
    pub fn combine(self, other: DeliveryStatus) -> DeliveryStatus {
        self.max(other)
    }

    fn rank(self) -> u8 {
        match self {
            DeliveryStatus::Ok => 0,
            DeliveryStatus::Bounced => 1,
            DeliveryStatus::Deferred => 2,
        }
    }

    fn max(self, other: DeliveryStatus) -> DeliveryStatus {
        if other.rank() > self.rank() {
            other
        } else {
            self
        }
    }
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryStatus::Ok => write!(f, "ok"),
            DeliveryStatus::Deferred => write!(f, "deferred"),
            DeliveryStatus::Bounced => write!(f, "bounced"),
        }
    }
}

/// Result of an alias resolution attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "status", rename_all = "snake_case")]
pub enum Resolution {
    /// No alias applies; deliver to the recipient as a plain user
    NotAlias,
    /// The recipient was handled here, with this status
    Handled(DeliveryStatus),
}

impl Resolution {
    /// Whether the engine took responsibility for the recipient
    pub fn is_handled(&self) -> bool {
        matches!(self, Resolution::Handled(_))
    }

    /// Status of a handled recipient
    pub fn status(&self) -> Option<DeliveryStatus> {
        match self {
            Resolution::NotAlias => None,
            Resolution::Handled(status) => Some(*status),
        }
    }
}
