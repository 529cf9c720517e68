//! Call originator boundary: the telephony backend that actually places a
//! call and reports how it ended.
//!
//! The engine only ever talks to this trait. Production wires in a real
//! telephony client; [`SimulatedOriginator`] is the shipped stand-in that
//! resolves after a randomized delay.

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use tokio::time::sleep;
use tracing::debug;

use crate::types::{CallId, CallOutcome};

/// Asynchronous, single-shot call resolution.
///
/// The engine invokes `resolve` exactly once per placed call and never
/// retries. The implementation returns only when the call has reached a
/// terminal outcome; an unreachable backend should report
/// [`CallOutcome::Failed`] rather than hang forever.
#[async_trait]
pub trait CallOriginator: Send + Sync {
    async fn resolve(&self, call_id: &CallId, phone: &str) -> CallOutcome;
}

/// Stand-in backend with randomized outcomes and delays.
///
/// Outcome table: answered after 15 s with a talk duration uniform in
/// [30, 210) seconds, busy after 5 s, no-answer after 8 s, unavailable after
/// 3 s. A time scale below 1.0 compresses the delays for demos.
#[derive(Debug, Clone)]
pub struct SimulatedOriginator {
    time_scale: f64,
}

impl SimulatedOriginator {
    pub fn new() -> Self {
        Self { time_scale: 1.0 }
    }

    /// Same outcome table with all delays multiplied by `scale`.
    pub fn with_time_scale(scale: f64) -> Self {
        Self { time_scale: scale }
    }
}

impl Default for SimulatedOriginator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CallOriginator for SimulatedOriginator {
    async fn resolve(&self, call_id: &CallId, phone: &str) -> CallOutcome {
        // Pick outcome and delay up front so the rng is not held across awaits
        let (outcome, delay) = {
            let mut rng = rand::thread_rng();
            match rng.gen_range(0..4) {
                0 => (
                    CallOutcome::Answered {
                        duration_secs: rng.gen_range(30..210),
                    },
                    Duration::from_secs(15),
                ),
                1 => (CallOutcome::Busy, Duration::from_secs(5)),
                2 => (CallOutcome::NoAnswer, Duration::from_secs(8)),
                _ => (CallOutcome::Unavailable, Duration::from_secs(3)),
            }
        };
        debug!(%call_id, %phone, ?outcome, "simulated call will resolve in {:?}", delay);
        sleep(delay.mul_f64(self.time_scale)).await;
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NumberStatus;

    #[tokio::test(start_paused = true)]
    async fn simulated_outcomes_stay_in_contract() {
        let originator = SimulatedOriginator::new();
        for _ in 0..32 {
            let outcome = originator.resolve(&CallId::new(), "555").await;
            match outcome {
                CallOutcome::Answered { duration_secs } => {
                    assert!((30..210).contains(&duration_secs));
                }
                CallOutcome::Busy | CallOutcome::NoAnswer | CallOutcome::Unavailable => {
                    assert_eq!(outcome.duration_secs(), 0);
                }
                CallOutcome::Failed => panic!("stand-in never emits failed"),
            }
            assert!(outcome.status().is_terminal());
            assert_ne!(outcome.status(), NumberStatus::Calling);
        }
    }
}
