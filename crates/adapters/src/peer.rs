// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `PeerAdapter`: carries inbound/outbound between two TeleClaude
//! daemons over the same control-plane HTTP contract (spec §2, §6). Has
//! no natural edit primitive — `send_output_update` is a no-op, per
//! spec §4.4: "the consumer reads session data on demand."

use crate::Adapter;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use teleclaude_core::{ErrorKind, Session};

pub struct PeerAdapter {
    name: String,
}

impl PeerAdapter {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[async_trait]
impl Adapter for PeerAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    async fn send_output_update(
        &self,
        _session: &Session,
        _previous: Option<&serde_json::Value>,
        _text: &str,
        _started_at: DateTime<Utc>,
        _last_changed_at: DateTime<Utc>,
    ) -> Result<Option<serde_json::Value>, ErrorKind> {
        Ok(None)
    }
}

#[cfg(test)]
#[path = "peer_tests.rs"]
mod tests;
