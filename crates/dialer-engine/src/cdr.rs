//! Call detail records: the permanent, append-only log of resolved calls.

use std::collections::VecDeque;

use chrono::{DateTime, Local};
use rand::seq::SliceRandom;
use serde::Serialize;

use crate::types::{CallId, CallOutcome, NumberStatus, SpamRisk};

/// Canned per-outcome result summaries. Production would source these from an
/// AI transcription step; the stand-in picks uniformly from the pool.
const ANSWERED_SUMMARIES: [&str; 5] = [
    "Customer asked for product details; a price quote was given.",
    "Customer is interested but has not decided yet.",
    "Positive conversation, follow-up required.",
    "Customer showed interest in the credit package.",
    "Detailed information requested, an email will be sent.",
];
const BUSY_SUMMARY: &str = "Line busy - will be retried at a different hour.";
const NO_ANSWER_SUMMARY: &str = "No answer - will be called on another day and time.";
const UNAVAILABLE_SUMMARY: &str = "Invalid number - removed from the list.";
const FAILED_SUMMARY: &str = "Call failed - the backend could not complete the attempt.";

/// One immutable record of a completed call.
#[derive(Debug, Clone, Serialize)]
pub struct CdrRecord {
    /// Reuses the id of the active call it was recorded for
    pub id: CallId,
    pub caller: String,
    pub callee: String,
    /// Resolution time, localized
    pub timestamp: DateTime<Local>,
    /// Talk duration formatted as `MM:SS`
    pub duration: String,
    pub status: NumberStatus,
    pub spam_risk: SpamRisk,
    pub summary: String,
}

/// Append-only CDR sequence, ordered newest-first.
///
/// The ordering is resolution order, not placement order, and is part of the
/// display/export contract.
#[derive(Debug, Default)]
pub struct CdrLog {
    records: VecDeque<CdrRecord>,
}

impl CdrLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend a freshly resolved record.
    pub(crate) fn append(&mut self, record: CdrRecord) {
        self.records.push_front(record);
    }

    pub fn records(&self) -> Vec<CdrRecord> {
        self.records.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Serialize the full log, newest-first, for report export.
    pub fn export_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.records)
    }
}

/// Human-readable result summary for an outcome, picked from the canned pool.
pub fn summary_for(outcome: &CallOutcome) -> &'static str {
    match outcome {
        CallOutcome::Answered { .. } => ANSWERED_SUMMARIES
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or(ANSWERED_SUMMARIES[0]),
        CallOutcome::Busy => BUSY_SUMMARY,
        CallOutcome::NoAnswer => NO_ANSWER_SUMMARY,
        CallOutcome::Unavailable => UNAVAILABLE_SUMMARY,
        CallOutcome::Failed => FAILED_SUMMARY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::format_duration;

    fn record(callee: &str) -> CdrRecord {
        CdrRecord {
            id: CallId::new(),
            caller: "+90 850 000 00 00".to_string(),
            callee: callee.to_string(),
            timestamp: Local::now(),
            duration: format_duration(42),
            status: NumberStatus::Answered,
            spam_risk: SpamRisk::Low,
            summary: summary_for(&CallOutcome::Answered { duration_secs: 42 }).to_string(),
        }
    }

    #[test]
    fn log_orders_newest_first() {
        let mut log = CdrLog::new();
        log.append(record("111"));
        log.append(record("222"));
        log.append(record("333"));

        let records = log.records();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].callee, "333");
        assert_eq!(records[2].callee, "111");
    }

    #[test]
    fn every_outcome_has_a_summary() {
        let outcomes = [
            CallOutcome::Answered { duration_secs: 60 },
            CallOutcome::Busy,
            CallOutcome::NoAnswer,
            CallOutcome::Unavailable,
            CallOutcome::Failed,
        ];
        for outcome in outcomes {
            assert!(!summary_for(&outcome).is_empty());
        }
        assert!(ANSWERED_SUMMARIES.contains(&summary_for(&CallOutcome::Answered {
            duration_secs: 60
        })));
    }

    #[test]
    fn export_is_valid_json() {
        let mut log = CdrLog::new();
        log.append(record("555"));
        let json = log.export_json().expect("export failed");
        let parsed: serde_json::Value = serde_json::from_str(&json).expect("invalid json");
        assert_eq!(parsed[0]["callee"], "555");
        assert_eq!(parsed[0]["duration"], "00:42");
        assert_eq!(parsed[0]["spam_risk"], "low");
    }
}
