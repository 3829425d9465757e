// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker registry (spec §4.2): a process-wide map keyed by session id,
//! guarded so concurrent `enqueue` calls spawn at most one drain task per
//! session. The lock is held only across the check-and-insert, never
//! across a worker's lifetime.

use std::collections::HashMap;
use std::sync::Arc;
use teleclaude_core::SessionId;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

#[derive(Clone)]
pub struct WorkerRegistry {
    workers: Arc<Mutex<HashMap<SessionId, JoinHandle<()>>>>,
}

impl Default for WorkerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkerRegistry {
    pub fn new() -> Self {
        Self {
            workers: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Registers `handle` for `session_id` if no worker is already
    /// running for it. Returns `true` if this call registered a new
    /// worker, `false` if one was already present (in which case `handle`
    /// is aborted immediately — the caller's spawn was redundant).
    pub async fn try_register(&self, session_id: SessionId, handle: JoinHandle<()>) -> bool {
        let mut guard = self.workers.lock().await;
        if guard.contains_key(&session_id) {
            handle.abort();
            return false;
        }
        guard.insert(session_id, handle);
        true
    }

    pub async fn is_running(&self, session_id: &SessionId) -> bool {
        self.workers.lock().await.contains_key(session_id)
    }

    /// Called by a worker when it finds its queue empty and is about to
    /// exit, so the next `enqueue` can spawn a fresh worker.
    pub async fn deregister(&self, session_id: &SessionId) {
        self.workers.lock().await.remove(session_id);
    }

    /// Aborts every running worker. Rows remain durable — only the task
    /// is cancelled (spec §4.2 `shutdown()`).
    pub async fn shutdown_all(&self) {
        let mut guard = self.workers.lock().await;
        for (_, handle) in guard.drain() {
            handle.abort();
        }
    }

    /// Aborts the worker for one session, e.g. on session close.
    pub async fn cancel(&self, session_id: &SessionId) {
        if let Some(handle) = self.workers.lock().await.remove(session_id) {
            handle.abort();
        }
    }

    pub async fn len(&self) -> usize {
        self.workers.lock().await.len()
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
