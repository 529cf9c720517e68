//! # dialer-engine
//!
//! Outbound-call campaign dispatcher: given a queue of phone numbers, the
//! engine paces call placement at a bounded batch size with a fixed stagger,
//! tracks each call's live duration, resolves every call to a terminal
//! outcome through a pluggable [`CallOriginator`] backend, and appends an
//! immutable call-detail record (CDR) per resolved call.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                DialerEngine                 │
//! ├──────────────┬───────────────┬──────────────┤
//! │ Number Queue │ Active Calls  │   CDR Log    │   one RwLock boundary
//! ├──────────────┴───────────────┴──────────────┤
//! │   Dispatcher (staggered placement tasks)    │
//! ├─────────────────────────────────────────────┤
//! │        CallOriginator (telephony)           │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Placement order: `start(batch_size)` snapshots the currently waiting
//! numbers, places `min(batch_size, waiting)` calls with a configurable
//! stagger between them, and checks the stop flag at each fire time. CDRs are
//! recorded in resolution order, newest first.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use dialer_engine::prelude::*;
//!
//! # async fn example() -> dialer_engine::Result<()> {
//! let engine = DialerEngine::new(
//!     DialerConfig::default(),
//!     Arc::new(SimulatedOriginator::new()),
//! );
//!
//! engine.add_number("+90 532 123 4567", "Jane Caller", "warm lead").await?;
//! engine.start_ticker().await;
//!
//! let placed = engine.start(5).await?;
//! println!("placed {} calls", placed);
//!
//! let stats = engine.stats().await;
//! println!("{} waiting, {} in flight", stats.waiting, stats.active_calls);
//! # Ok(())
//! # }
//! ```

pub mod cdr;
pub mod config;
pub mod engine;
pub mod error;
pub mod originator;
pub mod queue;
pub mod stats;
pub mod tracker;
pub mod types;

pub use config::{DialerConfig, BATCH_SIZES};
pub use engine::DialerEngine;
pub use error::{DialerError, Result};

/// Common imports for working with the dialer.
pub mod prelude {
    pub use crate::cdr::{CdrLog, CdrRecord};
    pub use crate::config::{DialerConfig, BATCH_SIZES};
    pub use crate::engine::{DialerEngine, DispatchSession};
    pub use crate::error::{DialerError, Result};
    pub use crate::originator::{CallOriginator, SimulatedOriginator};
    pub use crate::queue::QueuedNumber;
    pub use crate::stats::DialerStats;
    pub use crate::tracker::ActiveCall;
    pub use crate::types::{
        format_duration, CallId, CallOutcome, NumberId, NumberStatus, SpamRisk,
    };
}
