// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `FanoutRegistry`: broadcasts one outbound update to every registered
//! adapter (spec §2, §4.4). Concurrent across adapters — order between
//! adapters is not guaranteed, only per-(session, adapter) order is
//! preserved by the outbox's per-row claim discipline (spec §5).

use crate::Adapter;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use teleclaude_core::{ErrorKind, Session};
use teleclaude_store::Store;

#[derive(Default)]
pub struct FanoutRegistry {
    adapters: Vec<Arc<dyn Adapter>>,
}

impl FanoutRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, adapter: Arc<dyn Adapter>) {
        self.adapters.push(adapter);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Adapter>> {
        self.adapters.iter().find(|a| a.name() == name).cloned()
    }

    pub fn names(&self) -> Vec<&str> {
        self.adapters.iter().map(|a| a.name()).collect()
    }

    /// Broadcasts to every registered adapter except `exclude` (the
    /// originating adapter, for the inbound observer-update fanout in
    /// spec §4.3 step 5; `None` for a full outbound broadcast per §4.4).
    /// Each adapter's persisted `adapter_metadata` slice is updated only
    /// when that adapter returns `Some`. Returns one result per adapter
    /// attempted, in registration order — callers needing concurrency
    /// control over the outbox worker pool drive this from there.
    pub async fn broadcast(
        &self,
        store: &Store,
        session: &Session,
        text: &str,
        started_at: DateTime<Utc>,
        last_changed_at: DateTime<Utc>,
        exclude: Option<&str>,
    ) -> Vec<(String, Result<(), ErrorKind>)> {
        let targets: Vec<_> = self
            .adapters
            .iter()
            .filter(|a| exclude != Some(a.name()))
            .cloned()
            .collect();

        let futures = targets.into_iter().map(|adapter| {
            let session = session.clone();
            let text = text.to_string();
            async move {
                let previous = session.adapter_metadata.get(adapter.name()).cloned();
                let result = adapter
                    .send_output_update(&session, previous.as_ref(), &text, started_at, last_changed_at)
                    .await;
                (adapter, result)
            }
        });

        let outcomes = futures_util::future::join_all(futures).await;
        let mut results = Vec::with_capacity(outcomes.len());
        for (adapter, outcome) in outcomes {
            let name = adapter.name().to_string();
            match outcome {
                Ok(Some(value)) => {
                    let persisted = store
                        .set_adapter_metadata(&session.id, adapter.name(), value)
                        .await
                        .map_err(|e| e.into_core());
                    results.push((name, persisted));
                }
                Ok(None) => results.push((name, Ok(()))),
                Err(err) => results.push((name, Err(err))),
            }
        }
        results
    }
}

#[cfg(test)]
#[path = "fanout_tests.rs"]
mod tests;
