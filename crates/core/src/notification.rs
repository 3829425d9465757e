// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `NotificationRow`: a projection of an [`crate::EventEnvelope`] that a
//! human or operator may need to act on.

use crate::ids::{EnvelopeId, NotificationId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Whether a [`NotificationRow`] still needs attention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    None,
    Claimed,
    Resolved,
}

impl AgentStatus {
    pub const fn as_wire(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Claimed => "claimed",
            Self::Resolved => "resolved",
        }
    }
}

impl fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

impl FromStr for AgentStatus {
    type Err = super::status::UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "claimed" => Ok(Self::Claimed),
            "resolved" => Ok(Self::Resolved),
            other => Err(super::status::UnknownVariant::new("AgentStatus", other)),
        }
    }
}

/// A notification projected from an envelope by the pipeline's mandatory
/// Notification Projector cartridge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationRow {
    pub id: NotificationId,
    pub idempotency_key: String,
    pub group_key: String,
    pub envelope_id: EnvelopeId,
    pub summary: String,
    pub agent_status: AgentStatus,
    pub claimed_by: Option<String>,
    pub resolved_by: Option<String>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub payload: serde_json::Value,
}

impl NotificationRow {
    pub fn is_open(&self) -> bool {
        self.agent_status != AgentStatus::Resolved
    }
}

#[cfg(test)]
#[path = "notification_tests.rs"]
mod tests;
