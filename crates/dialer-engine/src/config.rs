//! Dialer configuration.

use std::time::Duration;

/// Batch sizes the dispatcher accepts for a single `start()` invocation.
pub const BATCH_SIZES: [usize; 11] = [1, 2, 3, 5, 10, 20, 50, 100, 200, 500, 1000];

/// Configuration for a [`DialerEngine`](crate::engine::DialerEngine).
#[derive(Debug, Clone)]
pub struct DialerConfig {
    /// System-assigned caller identity stamped on every CDR
    pub caller_id: String,

    /// Delay between consecutive call placements within a batch
    pub stagger_interval: Duration,

    /// Interval at which elapsed time is refreshed for active calls
    pub tick_interval: Duration,
}

impl Default for DialerConfig {
    fn default() -> Self {
        Self {
            caller_id: "+90 850 000 00 00".to_string(),
            stagger_interval: Duration::from_secs(2),
            tick_interval: Duration::from_secs(1),
        }
    }
}

/// Whether `size` is one of the supported [`BATCH_SIZES`].
pub fn is_supported_batch_size(size: usize) -> bool {
    BATCH_SIZES.contains(&size)
}
