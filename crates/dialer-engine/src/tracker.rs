//! Active call tracker: the set of in-flight calls with live elapsed time.
//!
//! Entries are added only by the dispatcher and removed only by the CDR
//! recorder; an entry exists exactly while its queue number is in `Calling`.

use chrono::{DateTime, Local};
use tokio::time::Instant;

use crate::types::{CallId, NumberId};

/// One in-flight call.
#[derive(Debug, Clone)]
pub struct ActiveCall {
    pub id: CallId,
    /// Back-reference to the queue entry this call was placed for
    pub number_id: NumberId,
    /// Copied at dispatch time for display stability
    pub phone: String,
    /// Wall-clock start time for display
    pub started_at: DateTime<Local>,
    /// Live duration, refreshed by [`ActiveCallTracker::tick`]
    pub elapsed_secs: u64,
    started: Instant,
}

impl ActiveCall {
    pub fn new(number_id: NumberId, phone: String) -> Self {
        Self {
            id: CallId::new(),
            number_id,
            phone,
            started_at: Local::now(),
            elapsed_secs: 0,
            started: Instant::now(),
        }
    }
}

/// Set of in-flight calls.
#[derive(Debug, Default)]
pub struct ActiveCallTracker {
    calls: Vec<ActiveCall>,
}

impl ActiveCallTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dispatcher-only: register a call placed just now.
    pub(crate) fn insert(&mut self, call: ActiveCall) {
        self.calls.push(call);
    }

    /// Recorder-only: drop the call once it resolved.
    pub(crate) fn remove(&mut self, call_id: &CallId) -> Option<ActiveCall> {
        let pos = self.calls.iter().position(|c| &c.id == call_id)?;
        Some(self.calls.remove(pos))
    }

    /// Recompute elapsed time for every entry. Idempotent; safe to call at
    /// any frequency.
    pub fn tick(&mut self) {
        for call in &mut self.calls {
            call.elapsed_secs = call.started.elapsed().as_secs();
        }
    }

    pub fn snapshot(&self) -> Vec<ActiveCall> {
        self.calls.clone()
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn tick_recomputes_elapsed_seconds() {
        let mut tracker = ActiveCallTracker::new();
        let call = ActiveCall::new(NumberId::new(), "555".to_string());
        let id = call.id.clone();
        tracker.insert(call);

        tokio::time::advance(Duration::from_secs(5)).await;
        tracker.tick();
        assert_eq!(tracker.snapshot()[0].elapsed_secs, 5);

        // Idempotent at the same instant
        tracker.tick();
        assert_eq!(tracker.snapshot()[0].elapsed_secs, 5);

        tokio::time::advance(Duration::from_secs(2)).await;
        tracker.tick();
        assert_eq!(tracker.snapshot()[0].elapsed_secs, 7);

        let removed = tracker.remove(&id).expect("call missing");
        assert_eq!(removed.phone, "555");
        assert!(tracker.is_empty());
    }

    #[tokio::test]
    async fn remove_unknown_call_is_none() {
        let mut tracker = ActiveCallTracker::new();
        assert!(tracker.remove(&CallId::new()).is_none());
    }
}
