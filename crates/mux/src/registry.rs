// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The in-memory Session Registry (spec §2, §4.7): `{session_id ->
//! SessionRecord}`, persisted through the Durable Store. Source of truth
//! for the control plane's identity cross-check and the delivery
//! primitive's gate-wait on `initializing` sessions.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use teleclaude_core::{Session, SessionId};

/// `{session_id -> Session}`, kept in sync with the Store on every
/// mutating registry operation. Reads never touch the Store — callers
/// that need a guaranteed-fresh view (e.g. after a peer daemon restart)
/// should call [`SessionRegistry::reload`].
#[derive(Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<SessionId, Session>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, session: Session) {
        self.sessions.write().insert(session.id, session);
    }

    pub fn get(&self, id: &SessionId) -> Option<Session> {
        self.sessions.read().get(id).cloned()
    }

    pub fn remove(&self, id: &SessionId) -> Option<Session> {
        self.sessions.write().remove(id)
    }

    /// Replaces the cached record with `session`, e.g. after a state
    /// transition. No-op if the session was removed concurrently.
    pub fn update(&self, session: Session) {
        let mut guard = self.sessions.write();
        if guard.contains_key(&session.id) {
            guard.insert(session.id, session);
        }
    }

    /// Seeds the registry from the Store's full session list. Used at
    /// daemon startup so identity cross-checks work before the first
    /// enqueue touches a session.
    pub fn reload(&self, sessions: Vec<Session>) {
        let mut guard = self.sessions.write();
        guard.clear();
        for session in sessions {
            guard.insert(session.id, session);
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
