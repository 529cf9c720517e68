//! # Dialer Engine
//!
//! Central orchestrator for an outbound campaign: paces call placement from
//! the number queue, tracks in-flight calls, and records a CDR when the
//! originator resolves each call.
//!
//! ```text
//! Number Queue ──► Dispatcher ──► Active Call Tracker
//!                      │                  │
//!                      ▼                  ▼ (resolve)
//!               CallOriginator ──► CDR Recorder ──► CDR Log
//! ```
//!
//! All three collections (queue, tracker, CDR log) plus the dispatch session
//! live behind one `RwLock`, so a placement and a resolution can never
//! observe a mid-transition state. Background work runs on spawned tasks:
//! one placement task per `start()`, one resolution task per placed call, and
//! an optional recurring ticker refreshing elapsed times.

use std::sync::Arc;

use chrono::Local;
use serde_json::Value;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{interval, sleep};
use tracing::{debug, info, warn};

use crate::cdr::{self, CdrLog, CdrRecord};
use crate::config::{self, DialerConfig};
use crate::error::{DialerError, Result};
use crate::originator::CallOriginator;
use crate::queue::{NumberQueue, QueuedNumber};
use crate::stats::DialerStats;
use crate::tracker::{ActiveCall, ActiveCallTracker};
use crate::types::{format_duration, CallId, CallOutcome, NumberId, NumberStatus, SpamRisk};

/// Dispatch session state, owned exclusively by the dispatcher.
#[derive(Debug, Clone, Copy, Default)]
pub struct DispatchSession {
    /// A batch's placement loop is currently live
    pub running: bool,
    /// Set by `stop()`; gates every future placement at fire time
    pub stop_requested: bool,
    /// Batch size requested by the last `start()`
    pub batch_size: usize,
    /// Generation counter; placements from superseded batches never fire
    batch_id: u64,
}

/// Everything mutated by placements and resolutions, guarded together.
#[derive(Debug, Default)]
struct DialerState {
    queue: NumberQueue,
    tracker: ActiveCallTracker,
    cdr: CdrLog,
    session: DispatchSession,
}

struct Inner {
    config: DialerConfig,
    originator: Arc<dyn CallOriginator>,
    state: RwLock<DialerState>,
    ticker: Mutex<Option<JoinHandle<()>>>,
}

/// The outbound-call campaign dispatcher.
///
/// Cheap to clone; all clones share the same state. Background tasks hold
/// their own handle to the shared state, so dropping the engine does not
/// abort calls already in flight.
#[derive(Clone)]
pub struct DialerEngine {
    inner: Arc<Inner>,
}

impl DialerEngine {
    /// Create a new engine over the given originator backend.
    pub fn new(config: DialerConfig, originator: Arc<dyn CallOriginator>) -> Self {
        Self {
            inner: Arc::new(Inner {
                config,
                originator,
                state: RwLock::new(DialerState::default()),
                ticker: Mutex::new(None),
            }),
        }
    }

    pub fn config(&self) -> &DialerConfig {
        &self.inner.config
    }

    // ========================================================================
    // Queue management
    // ========================================================================

    /// Add a single number to the queue in `Waiting` status.
    pub async fn add_number(&self, phone: &str, name: &str, note: &str) -> Result<NumberId> {
        let mut state = self.inner.state.write().await;
        let id = state.queue.enqueue(phone, name, note)?;
        info!(%id, phone, "number added to queue");
        Ok(id)
    }

    /// Bulk-import heterogeneous rows; returns the accepted count. Rows with
    /// no resolvable phone are dropped without error.
    pub async fn import_rows(&self, rows: &[Value]) -> usize {
        let mut state = self.inner.state.write().await;
        let accepted = state.queue.bulk_import(rows);
        info!(accepted, total = rows.len(), "bulk import finished");
        accepted
    }

    /// Remove a number from the queue. Refused while the number is mid-call.
    pub async fn remove_number(&self, id: &NumberId) -> Result<()> {
        let mut state = self.inner.state.write().await;
        let removed = state.queue.remove(id)?;
        info!(%id, phone = %removed.phone, "number removed from queue");
        Ok(())
    }

    /// Ordered queue view, optionally filtered by status.
    pub async fn list_numbers(&self, filter: Option<NumberStatus>) -> Vec<QueuedNumber> {
        self.inner.state.read().await.queue.list_filtered(filter)
    }

    // ========================================================================
    // Dispatching
    // ========================================================================

    /// Start a batch of at most `batch_size` calls over the numbers currently
    /// waiting.
    ///
    /// Rejected with no side effects if a batch is already running, if no
    /// number is waiting, or if `batch_size` is not one of
    /// [`config::BATCH_SIZES`]. Returns how many placements were scheduled
    /// (`min(batch_size, waiting)`); numbers enqueued after this call are not
    /// part of the batch.
    pub async fn start(&self, batch_size: usize) -> Result<usize> {
        if !config::is_supported_batch_size(batch_size) {
            return Err(DialerError::InvalidBatchSize { size: batch_size });
        }

        let (batch_id, targets) = {
            let mut state = self.inner.state.write().await;
            if state.session.running {
                return Err(DialerError::AlreadyRunning);
            }
            let mut targets = state.queue.waiting_targets();
            if targets.is_empty() {
                return Err(DialerError::NoWaitingNumbers);
            }
            targets.truncate(batch_size);
            state.session.batch_id += 1;
            state.session.running = true;
            state.session.stop_requested = false;
            state.session.batch_size = batch_size;
            (state.session.batch_id, targets)
        };

        let count = targets.len();
        info!(batch_id, count, batch_size, "🚀 starting outbound batch");

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            inner.run_batch(batch_id, targets).await;
        });

        Ok(count)
    }

    /// Request that no further placements fire.
    ///
    /// Takes effect at each placement's fire time; calls already in flight
    /// run to their natural resolution.
    pub async fn stop(&self) {
        let mut state = self.inner.state.write().await;
        state.session.stop_requested = true;
        state.session.running = false;
        info!("🛑 stop requested, no further placements will fire");
    }

    /// Snapshot of the dispatch session.
    pub async fn session(&self) -> DispatchSession {
        self.inner.state.read().await.session
    }

    pub async fn is_running(&self) -> bool {
        self.inner.state.read().await.session.running
    }

    // ========================================================================
    // Read side
    // ========================================================================

    /// Per-status counts over the current queue, plus the active call count.
    pub async fn stats(&self) -> DialerStats {
        let state = self.inner.state.read().await;
        let mut stats = DialerStats::from_queue(&state.queue.snapshot());
        stats.active_calls = state.tracker.len();
        stats
    }

    /// Snapshot of the in-flight call set.
    pub async fn active_calls(&self) -> Vec<ActiveCall> {
        self.inner.state.read().await.tracker.snapshot()
    }

    /// CDR log, newest-first.
    pub async fn cdr_records(&self) -> Vec<CdrRecord> {
        self.inner.state.read().await.cdr.records()
    }

    /// Export the CDR log as pretty-printed JSON, newest-first.
    pub async fn export_cdr_json(&self) -> serde_json::Result<String> {
        self.inner.state.read().await.cdr.export_json()
    }

    // ========================================================================
    // Elapsed-time ticker
    // ========================================================================

    /// Recompute elapsed time for every active call.
    pub async fn tick(&self) {
        self.inner.state.write().await.tracker.tick();
    }

    /// Spawn the recurring ticker at the configured interval. Idempotent.
    pub async fn start_ticker(&self) {
        let mut guard = self.inner.ticker.lock().await;
        if guard.is_some() {
            return;
        }
        let inner = Arc::clone(&self.inner);
        let handle = tokio::spawn(async move {
            let mut ticker = interval(inner.config.tick_interval);
            loop {
                ticker.tick().await;
                inner.state.write().await.tracker.tick();
            }
        });
        *guard = Some(handle);
        debug!("elapsed-time ticker started");
    }

    /// Stop the ticker task if it is running. In-flight calls and batches are
    /// not affected; use [`DialerEngine::stop`] for those.
    pub async fn shutdown(&self) {
        if let Some(handle) = self.inner.ticker.lock().await.take() {
            handle.abort();
            debug!("elapsed-time ticker stopped");
        }
    }
}

impl Inner {
    /// Placement loop for one batch: fires `targets.len()` placements with the
    /// configured stagger between consecutive ones, re-checking the session at
    /// each fire time.
    async fn run_batch(self: Arc<Self>, batch_id: u64, targets: Vec<(NumberId, String)>) {
        for (i, (number_id, phone)) in targets.into_iter().enumerate() {
            if i > 0 {
                sleep(self.config.stagger_interval).await;
            }

            let call = {
                let mut state = self.state.write().await;
                if state.session.batch_id != batch_id || state.session.stop_requested {
                    debug!(batch_id, "batch stopped or superseded, remaining placements skipped");
                    break;
                }
                if !state.queue.mark_calling(&number_id) {
                    debug!(%number_id, "target no longer waiting, placement skipped");
                    continue;
                }
                let call = ActiveCall::new(number_id.clone(), phone.clone());
                state.tracker.insert(call.clone());
                call
            };

            info!(call_id = %call.id, %phone, "📞 placing call");
            let inner = Arc::clone(&self);
            tokio::spawn(async move {
                let outcome = inner.originator.resolve(&call.id, &call.phone).await;
                inner
                    .complete_call(&call.id, &call.number_id, &call.phone, outcome)
                    .await;
            });
        }

        let mut state = self.state.write().await;
        if state.session.batch_id == batch_id {
            state.session.running = false;
            info!(batch_id, "batch placement finished");
        }
    }

    /// The single point where an in-flight call becomes resolved: records the
    /// CDR (newest-first), writes the terminal status back to the queue entry,
    /// and drops the active call.
    async fn complete_call(
        &self,
        call_id: &CallId,
        number_id: &NumberId,
        phone: &str,
        outcome: CallOutcome,
    ) {
        let summary = cdr::summary_for(&outcome).to_string();
        let status = outcome.status();
        let duration_secs = outcome.duration_secs();
        let now = Local::now();

        let record = CdrRecord {
            id: call_id.clone(),
            caller: self.config.caller_id.clone(),
            callee: phone.to_string(),
            timestamp: now,
            duration: format_duration(duration_secs),
            status,
            spam_risk: SpamRisk::Low,
            summary: summary.clone(),
        };

        let mut state = self.state.write().await;
        state.cdr.append(record);
        if !state.queue.mark_resolved(number_id, status, duration_secs, &summary, now) {
            warn!(%number_id, %call_id, "resolved call refers to a missing queue entry, CDR kept");
        }
        state.tracker.remove(call_id);
        info!(%call_id, phone, status = status.as_str(), duration_secs, "call resolved");
    }
}
