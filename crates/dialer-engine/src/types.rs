//! Core domain types shared across the dialer.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a queued number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NumberId(pub String);

impl NumberId {
    pub fn new() -> Self {
        Self(format!("NUM-{}", Uuid::new_v4()))
    }
}

impl fmt::Display for NumberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique identifier for a placed call. Distinct from the [`NumberId`] it was
/// dialed for; reused as the CDR id once the call resolves.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallId(pub String);

impl CallId {
    pub fn new() -> Self {
        Self(format!("CALL-{}", Uuid::new_v4()))
    }
}

impl fmt::Display for CallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle status of a queued number.
///
/// `Waiting` and `Calling` are transient; everything else is terminal and is
/// only ever written by the CDR recorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NumberStatus {
    Waiting,
    Calling,
    Answered,
    Busy,
    NoAnswer,
    Unavailable,
    Failed,
}

impl NumberStatus {
    /// True for any status other than `Waiting`/`Calling`.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, NumberStatus::Waiting | NumberStatus::Calling)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NumberStatus::Waiting => "waiting",
            NumberStatus::Calling => "calling",
            NumberStatus::Answered => "answered",
            NumberStatus::Busy => "busy",
            NumberStatus::NoAnswer => "no-answer",
            NumberStatus::Unavailable => "unavailable",
            NumberStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for NumberStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal outcome reported by the telephony backend for one placed call.
///
/// Only `Answered` carries a talk duration; every other outcome resolves with
/// a zero duration. `Failed` is the contractual outcome for a backend that
/// could not complete the attempt at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallOutcome {
    Answered { duration_secs: u64 },
    Busy,
    NoAnswer,
    Unavailable,
    Failed,
}

impl CallOutcome {
    /// The terminal queue status this outcome maps to.
    pub fn status(&self) -> NumberStatus {
        match self {
            CallOutcome::Answered { .. } => NumberStatus::Answered,
            CallOutcome::Busy => NumberStatus::Busy,
            CallOutcome::NoAnswer => NumberStatus::NoAnswer,
            CallOutcome::Unavailable => NumberStatus::Unavailable,
            CallOutcome::Failed => NumberStatus::Failed,
        }
    }

    pub fn duration_secs(&self) -> u64 {
        match self {
            CallOutcome::Answered { duration_secs } => *duration_secs,
            _ => 0,
        }
    }
}

/// Spam-risk classification attached to every CDR.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpamRisk {
    #[default]
    Low,
    Medium,
    High,
}

/// Format a duration in whole seconds as `MM:SS`.
pub fn format_duration(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
