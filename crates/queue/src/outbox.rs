// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `OutboxWorkerPool`: the outbound delivery half of spec §4.4.
//!
//! Unlike the inbound queue, ordering here is only required per
//! `(session, adapter)` (spec §9's resolved Open Question), not globally
//! FIFO, so a fixed pool of competing-consumer workers drains the shared
//! `outbox` table rather than one task per session. Each row still goes
//! through the same CAS claim / exponential backoff discipline as the
//! inbound queue.

use crate::backoff::backoff_for;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use teleclaude_adapters::{Adapter, FanoutRegistry};
use teleclaude_core::{Clock, ErrorKind, OutboxRow, SessionId};
use teleclaude_store::Store;
use tokio::task::JoinHandle;
use tracing::{info, warn};

const LOCK_CUTOFF: Duration = Duration::from_secs(300);
const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Deserialized shape of an [`OutboxRow`]'s `payload` column: enough to
/// replay the `send_output_update` call (spec §4.4's fanout contract).
#[derive(Debug, Deserialize)]
struct OutboxPayload {
    session_id: SessionId,
    text: String,
    started_at: DateTime<Utc>,
    last_changed_at: DateTime<Utc>,
}

pub struct OutboxWorkerPool<C: Clock> {
    store: Arc<Store>,
    fanout: Arc<FanoutRegistry>,
    clock: C,
    backoff_fn: fn(u32) -> Duration,
}

impl<C: Clock> OutboxWorkerPool<C> {
    pub fn new(store: Arc<Store>, fanout: Arc<FanoutRegistry>, clock: C) -> Self {
        Self {
            store,
            fanout,
            clock,
            backoff_fn: backoff_for,
        }
    }

    pub fn with_backoff_fn(mut self, backoff_fn: fn(u32) -> Duration) -> Self {
        self.backoff_fn = backoff_fn;
        self
    }

    /// Spawns `worker_count` competing-consumer drain tasks. Returns
    /// their handles so the caller (the daemon's shutdown path) can abort
    /// them; rows remain durable for the next `spawn`.
    pub fn spawn(self: &Arc<Self>, worker_count: usize) -> Vec<JoinHandle<()>> {
        (0..worker_count)
            .map(|_| {
                let pool = self.clone();
                tokio::spawn(async move { pool.worker_loop().await })
            })
            .collect()
    }

    async fn worker_loop(&self) {
        loop {
            match self.drain_one().await {
                DrainOutcome::Processed | DrainOutcome::ClaimLost => {}
                DrainOutcome::Empty => tokio::time::sleep(IDLE_POLL_INTERVAL).await,
            }
        }
    }

    /// Attempts to claim and deliver exactly one pending row. Exposed for
    /// tests so they can drive delivery deterministically instead of
    /// racing a background task.
    pub async fn drain_one(&self) -> DrainOutcome {
        let now = self.clock.now();
        let lock_cutoff = now - ChronoDuration::from_std(LOCK_CUTOFF).unwrap();

        let rows = match self.store.fetch_pending_outbox(1, now, lock_cutoff).await {
            Ok(rows) => rows,
            Err(err) => {
                warn!(error = %err, "fetch_pending_outbox failed");
                return DrainOutcome::Empty;
            }
        };
        let Some(row) = rows.into_iter().next() else {
            return DrainOutcome::Empty;
        };

        match self.store.claim_outbox(row.id, now, lock_cutoff).await {
            Ok(true) => {}
            Ok(false) => return DrainOutcome::ClaimLost,
            Err(err) => {
                warn!(row_id = row.id, error = %err, "claim_outbox failed");
                return DrainOutcome::ClaimLost;
            }
        }

        match self.deliver(&row).await {
            Ok(()) => {
                if let Err(err) = self.store.mark_outbox_delivered(row.id).await {
                    warn!(row_id = row.id, error = %err, "mark_outbox_delivered failed");
                }
                info!(row_id = row.id, envelope_id = %row.envelope_id, "delivered outbox row");
            }
            Err(err) => {
                let attempts = row.attempts + 1;
                let backoff = (self.backoff_fn)(row.attempts);
                let next_retry_at = self.clock.now() + ChronoDuration::from_std(backoff).unwrap();
                if let Err(store_err) = self
                    .store
                    .mark_outbox_failed(row.id, &err.to_string(), attempts, next_retry_at)
                    .await
                {
                    warn!(row_id = row.id, error = %store_err, "mark_outbox_failed failed");
                }
                warn!(row_id = row.id, error = %err, attempts, "outbox delivery failed; backing off");
            }
        }
        DrainOutcome::Processed
    }

    /// Dispatches one row to its target adapter, or broadcasts to every
    /// registered adapter when `target_adapter` is `None` (spec §4.4).
    async fn deliver(&self, row: &OutboxRow) -> Result<(), ErrorKind> {
        let payload: OutboxPayload = serde_json::from_value(row.payload.clone())
            .map_err(|e| ErrorKind::contract(format!("malformed outbox payload: {e}")))?;

        let session = self
            .store
            .get_session(&payload.session_id)
            .await
            .map_err(|e| e.into_core())?
            .ok_or_else(|| ErrorKind::permanent(format!("session {} missing", payload.session_id)))?;

        match &row.target_adapter {
            Some(name) => {
                let adapter = self
                    .fanout
                    .get(name)
                    .ok_or_else(|| ErrorKind::contract(format!("unknown adapter {name}")))?;
                let previous = session.adapter_metadata.get(name).cloned();
                let outcome = adapter
                    .send_output_update(
                        &session,
                        previous.as_ref(),
                        &payload.text,
                        payload.started_at,
                        payload.last_changed_at,
                    )
                    .await?;
                if let Some(value) = outcome {
                    self.store
                        .set_adapter_metadata(&session.id, name, value)
                        .await
                        .map_err(|e| e.into_core())?;
                }
                Ok(())
            }
            None => {
                let results = self
                    .fanout
                    .broadcast(
                        &self.store,
                        &session,
                        &payload.text,
                        payload.started_at,
                        payload.last_changed_at,
                        None,
                    )
                    .await;

                let mut first_err = None;
                for (name, result) in results {
                    if let Err(err) = result {
                        warn!(adapter = name, error = %err, "broadcast to adapter failed");
                        first_err.get_or_insert(err);
                    }
                }
                match first_err {
                    Some(err) => Err(err),
                    None => Ok(()),
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainOutcome {
    /// The row was claimed and attempted, whether delivery succeeded or
    /// was marked failed-and-retryable.
    Processed,
    ClaimLost,
    Empty,
}

#[cfg(test)]
#[path = "outbox_tests.rs"]
mod tests;
