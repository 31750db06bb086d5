//! In-memory delivery status records

use localmail_core::{DeliveryStatus, LocalState, StatusRecorder};
use parking_lot::Mutex;
use serde::Serialize;
use tracing::{info, warn};

/// Kind of terminal record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    /// Retry later
    Deferred,
    /// Permanent failure
    Bounced,
    /// Intentionally dropped
    Discarded,
}

/// One recorded outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryRecord {
    pub kind: RecordKind,
    pub queue_id: String,
    pub recipient: String,
    pub reason: String,
}

/// Status recorder that keeps its records in memory and logs them
#[derive(Default)]
pub struct RecordLog {
    records: Mutex<Vec<DeliveryRecord>>,
}

impl RecordLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all records, oldest first
    pub fn records(&self) -> Vec<DeliveryRecord> {
        self.records.lock().clone()
    }

    /// Records of one kind
    pub fn of_kind(&self, kind: RecordKind) -> Vec<DeliveryRecord> {
        self.records
            .lock()
            .iter()
            .filter(|record| record.kind == kind)
            .cloned()
            .collect()
    }

    fn append(&self, kind: RecordKind, state: &LocalState, reason: &str) {
        self.records.lock().push(DeliveryRecord {
            kind,
            queue_id: state.queue_id.clone(),
            recipient: state.recipient.clone(),
            reason: reason.to_string(),
        });
    }
}

impl StatusRecorder for RecordLog {
    fn defer(&self, state: &LocalState, reason: &str) -> DeliveryStatus {
        warn!("{}: to=<{}>, status=deferred ({})", state.queue_id, state.recipient, reason);
        self.append(RecordKind::Deferred, state, reason);
        DeliveryStatus::Deferred
    }

    fn bounce(&self, state: &LocalState, reason: &str) -> DeliveryStatus {
        warn!("{}: to=<{}>, status=bounced ({})", state.queue_id, state.recipient, reason);
        self.append(RecordKind::Bounced, state, reason);
        DeliveryStatus::Bounced
    }

    fn discard(&self, state: &LocalState) -> DeliveryStatus {
        info!("{}: to=<{}>, status=sent (discarded)", state.queue_id, state.recipient);
        self.append(RecordKind::Discarded, state, "discarded");
        DeliveryStatus::Ok
    }
}
