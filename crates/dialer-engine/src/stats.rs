//! Stats aggregator: per-status counts derived from current queue state.

use serde::Serialize;

use crate::queue::QueuedNumber;
use crate::types::NumberStatus;

/// Counts per status plus the total, recomputed on every read.
///
/// Pure fold over a queue snapshot; cheap enough to call on every poll rather
/// than maintaining counters incrementally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DialerStats {
    pub total: usize,
    pub waiting: usize,
    pub calling: usize,
    pub answered: usize,
    pub busy: usize,
    pub unavailable: usize,
    pub no_answer: usize,
    pub failed: usize,
    /// Size of the active call set (tracker state, not a queue status fold)
    pub active_calls: usize,
}

impl DialerStats {
    pub fn from_queue(entries: &[QueuedNumber]) -> Self {
        let mut stats = Self {
            total: entries.len(),
            ..Self::default()
        };
        for entry in entries {
            match entry.status {
                NumberStatus::Waiting => stats.waiting += 1,
                NumberStatus::Calling => stats.calling += 1,
                NumberStatus::Answered => stats.answered += 1,
                NumberStatus::Busy => stats.busy += 1,
                NumberStatus::Unavailable => stats.unavailable += 1,
                NumberStatus::NoAnswer => stats.no_answer += 1,
                NumberStatus::Failed => stats.failed += 1,
            }
        }
        stats
    }

    /// Sum of the per-status counts; always equals `total`.
    pub fn status_sum(&self) -> usize {
        self.waiting
            + self.calling
            + self.answered
            + self.busy
            + self.unavailable
            + self.no_answer
            + self.failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::NumberQueue;
    use chrono::Local;

    #[test]
    fn counts_sum_to_total() {
        let mut queue = NumberQueue::new();
        let a = queue.enqueue("111", "", "").unwrap();
        let b = queue.enqueue("222", "", "").unwrap();
        queue.enqueue("333", "", "").unwrap();
        queue.enqueue("444", "", "").unwrap();
        queue.mark_calling(&a);
        queue.mark_calling(&b);
        queue.mark_resolved(&b, NumberStatus::NoAnswer, 0, "-", Local::now());

        let stats = DialerStats::from_queue(&queue.snapshot());
        assert_eq!(stats.total, 4);
        assert_eq!(stats.waiting, 2);
        assert_eq!(stats.calling, 1);
        assert_eq!(stats.no_answer, 1);
        assert_eq!(stats.status_sum(), stats.total);
    }

    #[test]
    fn empty_queue_is_all_zero() {
        let stats = DialerStats::from_queue(&[]);
        assert_eq!(stats, DialerStats::default());
        assert_eq!(stats.status_sum(), 0);
    }
}
