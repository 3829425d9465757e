// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `InboundQueue`: the per-session FIFO worker pool (spec §4.2).
//!
//! `enqueue` persists a row and ensures a drain task is running for its
//! session; the per-session worker loop below is a direct translation of
//! spec §4.2's pseudocode, with `deliver_inbound` (spec §4.3) as the body
//! of the `try` block.

use crate::backoff::backoff_for;
use crate::delivery::{deliver_inbound, DeliveryContext, OutputObserver};
use crate::registry::WorkerRegistry;
use async_trait::async_trait;
use chrono::Duration as ChronoDuration;
use std::sync::Arc;
use std::time::Duration;
use teleclaude_adapters::FanoutRegistry;
use teleclaude_core::{Clock, ErrorKind, MessageType, SessionId, SessionState};
use teleclaude_mux::{MuxBridge, SessionRegistry};
use teleclaude_store::Store;
use tracing::{info, warn};

/// A row is eligible for re-claim once its lock is older than this —
/// a crashed worker cannot block progress (spec §4.2 edge cases, §5).
const LOCK_CUTOFF: Duration = Duration::from_secs(300);

/// Signals the adapter-side typing indicator when a message is accepted
/// (spec §4.2 `enqueue`: "idempotent per row"). Adapters that have no
/// such affordance (peer-daemon, local UI) implement this as a no-op.
#[async_trait]
pub trait TypingIndicator: Send + Sync + 'static {
    async fn notify(&self, session_id: SessionId);
}

pub struct NoopTypingIndicator;

#[async_trait]
impl TypingIndicator for NoopTypingIndicator {
    async fn notify(&self, _session_id: SessionId) {}
}

pub struct InboundQueue<M: MuxBridge, C: Clock, O: OutputObserver, T: TypingIndicator> {
    store: Arc<Store>,
    registry: Arc<SessionRegistry>,
    bridge: Arc<M>,
    fanout: Arc<FanoutRegistry>,
    clock: C,
    observer: Arc<O>,
    typing: Arc<T>,
    workers: WorkerRegistry,
    /// Real-time sleep duration for a given attempt count. Production
    /// wiring passes [`backoff_for`] directly; tests inject a
    /// millisecond-scale function so retry tests don't block for minutes.
    backoff_fn: fn(u32) -> Duration,
}

impl<M: MuxBridge, C: Clock, O: OutputObserver, T: TypingIndicator> InboundQueue<M, C, O, T> {
    pub fn new(
        store: Arc<Store>,
        registry: Arc<SessionRegistry>,
        bridge: Arc<M>,
        fanout: Arc<FanoutRegistry>,
        clock: C,
        observer: Arc<O>,
        typing: Arc<T>,
    ) -> Self {
        Self {
            store,
            registry,
            bridge,
            fanout,
            clock,
            observer,
            typing,
            workers: WorkerRegistry::new(),
            backoff_fn: backoff_for,
        }
    }

    /// Overrides the backoff schedule. Exposed for tests that need to
    /// observe retry behavior without waiting out the production
    /// 2s-to-300s schedule.
    pub fn with_backoff_fn(mut self, backoff_fn: fn(u32) -> Duration) -> Self {
        self.backoff_fn = backoff_fn;
        self
    }

    /// Enqueues one message, returning the new row id, or `Ok(None)` if
    /// `(origin, source_message_id)` already exists (spec §4.2: platform
    /// replay dedup, not an error).
    #[allow(clippy::too_many_arguments)]
    pub async fn enqueue(
        &self,
        session_id: SessionId,
        origin: &str,
        message_type: MessageType,
        content: &str,
        payload: serde_json::Value,
        actor: &str,
        source_message_id: Option<&str>,
        source_channel_id: Option<&str>,
    ) -> Result<Option<i64>, ErrorKind> {
        let session = self
            .registry
            .get(&session_id)
            .ok_or_else(|| ErrorKind::contract(format!("unknown session {session_id}")))?;
        if session.state == SessionState::Closed {
            return Err(ErrorKind::contract(format!("session {session_id} is closed")));
        }

        let now = self.clock.now();
        let row_id = self
            .store
            .enqueue_inbound(
                &session_id,
                origin,
                message_type,
                content,
                payload,
                actor,
                source_message_id,
                source_channel_id,
                now,
            )
            .await
            .map_err(|e| e.into_core())?;

        if row_id.is_some() {
            self.typing.notify(session_id).await;
            self.ensure_worker(session_id).await;
        }
        Ok(row_id)
    }

    /// Spawns a drain task for `session_id` if one is not already
    /// running. Safe to call redundantly — only the first caller's spawn
    /// survives; a redundant spawn is aborted immediately by
    /// [`WorkerRegistry::try_register`].
    pub async fn ensure_worker(&self, session_id: SessionId) {
        let store = self.store.clone();
        let registry = self.registry.clone();
        let bridge = self.bridge.clone();
        let fanout = self.fanout.clone();
        let clock = self.clock.clone();
        let observer = self.observer.clone();
        let workers = self.workers.clone();
        let backoff_fn = self.backoff_fn;

        let handle = tokio::spawn(async move {
            worker_loop(session_id, store, registry, bridge, fanout, clock, observer, workers, backoff_fn).await;
        });

        self.workers.try_register(session_id, handle).await;
    }

    /// Marks every non-terminal row for `session_id` as `expired` and
    /// cancels its worker task.
    pub async fn expire_session(&self, session_id: SessionId) -> Result<u64, ErrorKind> {
        let count = self
            .store
            .expire_session_inbound(&session_id)
            .await
            .map_err(|e| e.into_core())?;
        self.workers.cancel(&session_id).await;
        Ok(count)
    }

    /// Re-discovers sessions with pending rows and spawns workers for
    /// each, for use at daemon startup.
    pub async fn startup(&self) -> Result<usize, ErrorKind> {
        let sessions = self
            .store
            .sessions_with_pending_inbound()
            .await
            .map_err(|e| e.into_core())?;
        let count = sessions.len();
        for session_id in sessions {
            self.ensure_worker(session_id).await;
        }
        Ok(count)
    }

    /// Cancels every worker task. Rows remain durable for the next
    /// `startup()`.
    pub async fn shutdown(&self) {
        self.workers.shutdown_all().await;
    }

    pub async fn worker_count(&self) -> usize {
        self.workers.len().await
    }
}

#[allow(clippy::too_many_arguments)]
async fn worker_loop<M: MuxBridge, C: Clock, O: OutputObserver>(
    session_id: SessionId,
    store: Arc<Store>,
    registry: Arc<SessionRegistry>,
    bridge: Arc<M>,
    fanout: Arc<FanoutRegistry>,
    clock: C,
    observer: Arc<O>,
    workers: WorkerRegistry,
    backoff_fn: fn(u32) -> Duration,
) {
    loop {
        let now = clock.now();
        let lock_cutoff = now - ChronoDuration::from_std(LOCK_CUTOFF).unwrap();

        let rows = match store.fetch_pending_inbound(&session_id, 1, now, lock_cutoff).await {
            Ok(rows) => rows,
            Err(err) => {
                warn!(%session_id, error = %err, "fetch_pending_inbound failed; worker exiting");
                workers.deregister(&session_id).await;
                return;
            }
        };

        let Some(row) = rows.into_iter().next() else {
            workers.deregister(&session_id).await;
            return;
        };

        match store.claim_inbound(row.id, now, lock_cutoff).await {
            Ok(true) => {}
            Ok(false) => {
                // Another worker claimed it first; this can only happen
                // under a concurrent re-claim sweep, never in steady
                // state since one worker owns this session.
                tokio::time::sleep(Duration::from_millis(50)).await;
                continue;
            }
            Err(err) => {
                warn!(%session_id, row_id = row.id, error = %err, "claim_inbound failed");
                continue;
            }
        }

        let ctx = DeliveryContext {
            store: &store,
            registry: &registry,
            bridge: &bridge,
            fanout: &fanout,
            clock: &clock,
            observer: observer.as_ref(),
        };

        match deliver_inbound(session_id, &row.origin, &row.content, &ctx).await {
            Ok(()) => {
                let now = clock.now();
                if let Err(err) = store.mark_inbound_delivered(row.id, now).await {
                    warn!(%session_id, row_id = row.id, error = %err, "mark_inbound_delivered failed");
                }
                info!(%session_id, row_id = row.id, "delivered inbound row");
            }
            Err(err) => {
                let attempt_count = row.attempt_count + 1;
                let backoff = backoff_fn(row.attempt_count);
                let next_retry_at = clock.now() + ChronoDuration::from_std(backoff).unwrap();
                if let Err(store_err) = store
                    .mark_inbound_failed(row.id, &err.to_string(), attempt_count, next_retry_at)
                    .await
                {
                    warn!(%session_id, row_id = row.id, error = %store_err, "mark_inbound_failed failed");
                }
                warn!(%session_id, row_id = row.id, error = %err, attempt_count, "delivery failed; backing off");
                // Hold this worker so FIFO order is preserved — later rows
                // must not leapfrog a row still retrying (spec §4.2).
                tokio::time::sleep(backoff).await;
            }
        }
    }
}

#[cfg(test)]
#[path = "inbound_tests.rs"]
mod tests;
