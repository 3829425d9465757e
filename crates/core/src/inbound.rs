// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `InboundRow`: one user message accepted by an adapter, queued for
//! exactly-once (modulo platform replays) delivery into a session.

use crate::ids::SessionId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Shape of the inbound message content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    Text,
    Voice,
    File,
    Keys,
}

impl MessageType {
    pub const fn as_wire(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Voice => "voice",
            Self::File => "file",
            Self::Keys => "keys",
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

impl FromStr for MessageType {
    type Err = super::status::UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "voice" => Ok(Self::Voice),
            "file" => Ok(Self::File),
            "keys" => Ok(Self::Keys),
            other => Err(super::status::UnknownVariant::new("MessageType", other)),
        }
    }
}

/// Lifecycle state of an [`InboundRow`]. A row in `Processing` has a
/// non-null `locked_at`; `Delivered` and `Expired` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InboundStatus {
    Pending,
    Processing,
    Delivered,
    Failed,
    Expired,
}

impl InboundStatus {
    pub const fn as_wire(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Delivered => "delivered",
            Self::Failed => "failed",
            Self::Expired => "expired",
        }
    }

    /// Terminal statuses never transition again.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Expired)
    }
}

impl fmt::Display for InboundStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

impl FromStr for InboundStatus {
    type Err = super::status::UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "delivered" => Ok(Self::Delivered),
            "failed" => Ok(Self::Failed),
            "expired" => Ok(Self::Expired),
            other => Err(super::status::UnknownVariant::new("InboundStatus", other)),
        }
    }
}

/// One row in the inbound queue, identified by a monotonically increasing
/// local id assigned by the Durable Store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InboundRow {
    pub id: i64,
    pub session_id: SessionId,
    pub origin: String,
    pub message_type: MessageType,
    pub content: String,
    /// e.g. the source URL for a voice message.
    pub payload: serde_json::Value,
    pub actor: String,
    pub status: InboundStatus,
    pub created_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
    pub attempt_count: u32,
    pub next_retry_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub locked_at: Option<DateTime<Utc>>,
    /// Together with `origin`, deduplicates platform-originated replays.
    pub source_message_id: Option<String>,
    pub source_channel_id: Option<String>,
}

impl InboundRow {
    /// The invariant that a processing row always carries a lock.
    pub fn respects_lock_invariant(&self) -> bool {
        self.status != InboundStatus::Processing || self.locked_at.is_some()
    }
}

#[cfg(test)]
#[path = "inbound_tests.rs"]
mod tests;
