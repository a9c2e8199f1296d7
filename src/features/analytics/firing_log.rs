//! In-memory log of alert firings.
//!
//! Every firing is recorded here regardless of permission outcome, so "the
//! timer fired but the platform suppressed the alert" stays observable. The
//! log is append-only; readers get snapshots.

use chrono::{DateTime, Local};
use log::info;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// One alert firing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FiringRecord {
    /// The message that fired.
    pub message: String,

    /// Wall-clock time of the firing.
    pub fired_at: DateTime<Local>,

    /// Whether the platform alert was actually shown (permission granted and
    /// the sink accepted the message).
    pub presented: bool,
}

/// Append-only diagnostic log, shared by a scheduler instance and its owner.
#[derive(Default)]
pub struct FiringLog {
    records: Mutex<Vec<FiringRecord>>,
}

impl FiringLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one firing. Also emits it to the application log.
    pub fn record(&self, message: &str, fired_at: DateTime<Local>, presented: bool) {
        info!(
            "Alert fired at {}: {:?} (presented: {})",
            fired_at.format("%H:%M:%S"),
            message,
            presented
        );
        self.records.lock().unwrap().push(FiringRecord {
            message: message.to_string(),
            fired_at,
            presented,
        });
    }

    /// The most recent `n` firings, newest last.
    pub fn recent(&self, n: usize) -> Vec<FiringRecord> {
        let records = self.records.lock().unwrap();
        let start = records.len().saturating_sub(n);
        records[start..].to_vec()
    }

    /// Total number of firings recorded.
    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop all records.
    pub fn clear(&self) {
        self.records.lock().unwrap().clear();
    }
}
