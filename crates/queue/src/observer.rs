// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `PaneOutputObserver`: the concrete [`crate::OutputObserver`] wired at
//! daemon startup (spec §4.3 step 7, §4.4). "Agent output -> polling
//! observer -> event envelope -> pipeline -> outbox row" (spec overview)
//! is split across two crates at the pipeline boundary: this observer
//! owns the polling and the outbox-row insert; `teleclaude-pipeline` owns
//! domain events published explicitly through the control plane. Routine
//! output-change updates never run through the Event Pipeline — doing so
//! would make the Notification Projector (spec §4.5 step 2, unconditional
//! by design) turn every pane update into a todo.

use crate::delivery::OutputObserver;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use teleclaude_core::{Clock, EnvelopeId, Session, SessionId};
use teleclaude_mux::{MuxBridge, SessionRegistry};
use teleclaude_store::Store;
use tokio::sync::Mutex;
use tracing::warn;

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Reserved `adapter_metadata` key a session carries when its output
/// should be read from a sink file rather than the multiplexer pane
/// (spec §4.4's "two output sources", e.g. an agent that writes its own
/// transcript file). Never a registered [`teleclaude_adapters::Adapter`]
/// name.
const OUTPUT_SINK_METADATA_KEY: &str = "_output_sink";

/// Where [`observe_output`] reads a session's current output from. Chosen
/// once per poll based on `adapter_metadata`, never branching on adapter
/// identity (spec §4.4).
enum OutputSource {
    Pane,
    SinkFile(PathBuf),
}

fn output_source(session: &Session) -> OutputSource {
    match session
        .adapter_metadata
        .get(OUTPUT_SINK_METADATA_KEY)
        .and_then(|v| v.get("path"))
        .and_then(|v| v.as_str())
    {
        Some(path) => OutputSource::SinkFile(PathBuf::from(path)),
        None => OutputSource::Pane,
    }
}

/// The single code path both output sources funnel through.
async fn observe_output<M: MuxBridge>(source: &OutputSource, bridge: &M, pane_name: &str) -> Result<String, ()> {
    match source {
        OutputSource::Pane => bridge.capture_pane(pane_name).await.map_err(|_| ()),
        OutputSource::SinkFile(path) => tokio::fs::read_to_string(path).await.map_err(|_| ()),
    }
}

/// Polls a session's output on a fixed interval and enqueues a broadcast
/// outbox row whenever it changes, coalescing rapid changes into the
/// same edit target the way the fanout's edit-in-place contract expects
/// (spec §8 "observer edits, doesn't spam").
pub struct PaneOutputObserver<M: MuxBridge, C: Clock> {
    registry: Arc<SessionRegistry>,
    bridge: Arc<M>,
    store: Arc<Store>,
    clock: C,
    running: Arc<Mutex<HashSet<SessionId>>>,
    poll_interval: Duration,
}

impl<M: MuxBridge, C: Clock> PaneOutputObserver<M, C> {
    pub fn new(registry: Arc<SessionRegistry>, bridge: Arc<M>, store: Arc<Store>, clock: C) -> Self {
        Self {
            registry,
            bridge,
            store,
            clock,
            running: Arc::new(Mutex::new(HashSet::new())),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Currently-polled session count, exposed for tests and diagnostics.
    pub async fn active_count(&self) -> usize {
        self.running.lock().await.len()
    }
}

#[async_trait]
impl<M: MuxBridge, C: Clock> OutputObserver for PaneOutputObserver<M, C> {
    async fn ensure_started(&self, session_id: SessionId) {
        let mut running = self.running.lock().await;
        if !running.insert(session_id) {
            return;
        }
        drop(running);

        let registry = self.registry.clone();
        let bridge = self.bridge.clone();
        let store = self.store.clone();
        let clock = self.clock.clone();
        let running = self.running.clone();
        let poll_interval = self.poll_interval;

        tokio::spawn(async move {
            let mut last_seen: HashMap<SessionId, (String, DateTime<Utc>)> = HashMap::new();
            loop {
                tokio::time::sleep(poll_interval).await;

                let Some(session) = registry.get(&session_id) else {
                    break;
                };
                let source = output_source(&session);
                let text = match observe_output(&source, bridge.as_ref(), &session.multiplexer_session_name).await {
                    Ok(text) => text,
                    Err(()) => {
                        warn!(session_id = %session_id, "output observer could not read session output");
                        continue;
                    }
                };

                let now = clock.now();
                let changed = match last_seen.get(&session_id) {
                    Some((previous, _)) => previous != &text,
                    None => !text.is_empty(),
                };
                if !changed {
                    continue;
                }
                let started_at = last_seen.get(&session_id).map(|(_, started)| *started).unwrap_or(now);
                last_seen.insert(session_id, (text.clone(), started_at));

                let payload = serde_json::json!({
                    "session_id": session_id,
                    "text": text,
                    "started_at": started_at,
                    "last_changed_at": now,
                });
                if let Err(err) = store.enqueue_outbox(&EnvelopeId::new(), None, payload, now).await {
                    warn!(session_id = %session_id, error = %err, "failed to enqueue outbox row for output update");
                }
            }
            running.lock().await.remove(&session_id);
        });
    }
}

#[cfg(test)]
#[path = "observer_tests.rs"]
mod tests;
