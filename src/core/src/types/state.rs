//! Per-recipient delivery state threaded through recursive expansion

use serde::{Deserialize, Serialize};
use std::fmt;

/// How the current local name was reached
///
/// The dispatch stage reads this to decide whether deliveries to
/// `|command` and `/file/name` are allowed at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpansionType {
    /// Recipient as it arrived from the queue
    TopLevel,
    /// Result of an alias database expansion
    Alias,
    /// Result of an :include: file expansion
    Include,
    /// Result of a .forward file expansion
    Forward,
}

impl fmt::Display for ExpansionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExpansionType::TopLevel => "top-level",
            ExpansionType::Alias => "alias",
            ExpansionType::Include => "include",
            ExpansionType::Forward => "forward",
        };
        write!(f, "{}", name)
    }
}

/// Delivery state for one recursion frame
///
/// Frames are values: every stage that changes an attribute derives a new
/// frame from its caller's and hands that down, so the caller's view is
/// restored automatically when the nested call returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalState {
    /// Queue identifier of the message being delivered
    pub queue_id: String,

    /// Original top-level recipient address
    pub recipient: String,

    /// Local name currently being resolved
    pub local: String,

    /// Envelope sender used for delivery problem reports
    pub sender: String,

    /// Owner notification address, when owner delegation is active
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,

    /// Name whose expansion produced `local`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp_from: Option<String>,

    /// How `local` was reached
    pub exp_type: ExpansionType,

    /// Delivered-To address recorded for external loop detection
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivered: Option<String>,

    /// Nesting depth of this frame
    pub level: u32,
}

impl LocalState {
    /// Create the frame for a top-level recipient
    pub fn top_level(
        queue_id: impl Into<String>,
        recipient: impl Into<String>,
        local: impl Into<String>,
        sender: impl Into<String>,
    ) -> Self {
        Self {
            queue_id: queue_id.into(),
            recipient: recipient.into(),
            local: local.into(),
            sender: sender.into(),
            owner: None,
            exp_from: None,
            exp_type: ExpansionType::TopLevel,
            delivered: None,
            level: 0,
        }
    }

    /// Start this frame at a given depth
    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    /// Derive the frame for one destination of the current expansion
    ///
    /// Everything except `local` is inherited, including `exp_from`, so that
    /// the next resolution can recognise an alias that lists its own name.
    pub fn for_token(&self, local: impl Into<String>) -> Self {
        Self {
            local: local.into(),
            ..self.clone()
        }
    }

    /// Whether `local` names its own expansion origin (case-insensitive)
    pub fn is_self_reference(&self) -> bool {
        self.exp_from
            .as_deref()
            .map(|from| from.eq_ignore_ascii_case(&self.local))
            .unwrap_or(false)
    }
}
