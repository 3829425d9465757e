// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `LocalUiAdapter`: used by the terminal UI and by tests. In-process
//! channel, no network — the terminal UI's rendering layer itself is out
//! of scope (spec §1), but the channel contract that feeds it is the
//! adapter boundary this crate owns.

use crate::Adapter;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use teleclaude_core::{ErrorKind, Session, SessionId};
use tokio::sync::broadcast;

/// One broadcast to local-UI subscribers. Since the UI always shows the
/// latest text for a session (no chat-style message history to edit),
/// this carries the full replacement text rather than a diff.
#[derive(Debug, Clone)]
pub struct LocalUiEvent {
    pub session_id: SessionId,
    pub text: String,
    pub last_changed_at: DateTime<Utc>,
}

pub struct LocalUiAdapter {
    name: String,
    sender: broadcast::Sender<LocalUiEvent>,
}

impl LocalUiAdapter {
    pub fn new(name: impl Into<String>) -> Self {
        let (sender, _) = broadcast::channel(256);
        Self {
            name: name.into(),
            sender,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LocalUiEvent> {
        self.sender.subscribe()
    }
}

#[async_trait]
impl Adapter for LocalUiAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    async fn send_output_update(
        &self,
        session: &Session,
        _previous: Option<&serde_json::Value>,
        text: &str,
        _started_at: DateTime<Utc>,
        last_changed_at: DateTime<Utc>,
    ) -> Result<Option<serde_json::Value>, ErrorKind> {
        // Best-effort: no subscriber is not a delivery failure, the next
        // poll cycle's state is still authoritative (spec §7).
        let _ = self.sender.send(LocalUiEvent {
            session_id: session.id,
            text: text.to_string(),
            last_changed_at,
        });
        Ok(None)
    }
}

#[cfg(test)]
#[path = "local_ui_tests.rs"]
mod tests;
