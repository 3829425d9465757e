// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `Session` aggregate (spec §3): the unit every inbound message is
//! routed to and every outbound message is attributed to.

use crate::ids::{ComputerId, SessionId};
use crate::roles::{HumanRole, SystemRole};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Lifecycle state of a [`Session`]. Monotonic except for the
/// `Paused <-> Active` transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Initializing,
    Active,
    Paused,
    Closed,
}

impl SessionState {
    pub const fn as_wire(self) -> &'static str {
        match self {
            Self::Initializing => "initializing",
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Closed => "closed",
        }
    }

    /// Whether `self -> next` is an allowed transition under the
    /// monotonic-except-pause/active invariant.
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Initializing, Self::Active)
                | (Self::Initializing, Self::Closed)
                | (Self::Active, Self::Paused)
                | (Self::Active, Self::Closed)
                | (Self::Paused, Self::Active)
                | (Self::Paused, Self::Closed)
        )
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

impl FromStr for SessionState {
    type Err = super::status::UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "initializing" => Ok(Self::Initializing),
            "active" => Ok(Self::Active),
            "paused" => Ok(Self::Paused),
            "closed" => Ok(Self::Closed),
            other => Err(super::status::UnknownVariant::new("SessionState", other)),
        }
    }
}

/// Per-adapter private state attached to a session, e.g. the edited
/// output-message reference a chat-platform adapter needs to keep editing
/// the same bubble. The fanout layer writes only under its own adapter
/// name's key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdapterMetadata(pub HashMap<String, serde_json::Value>);

impl AdapterMetadata {
    pub fn get(&self, adapter_name: &str) -> Option<&serde_json::Value> {
        self.0.get(adapter_name)
    }

    pub fn set(&mut self, adapter_name: impl Into<String>, value: serde_json::Value) {
        self.0.insert(adapter_name.into(), value);
    }
}

/// A single conversational/working unit routed to one agent process
/// hosted in a multiplexer session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub owning_computer: ComputerId,
    pub project_path: String,
    /// Unforgeable reference to the backing multiplexer session; unique
    /// per owning computer.
    pub multiplexer_session_name: String,
    pub origin_adapter: String,
    pub title: String,
    pub system_role: SystemRole,
    pub human_role: HumanRole,
    pub created_at: DateTime<Utc>,
    pub last_activity_at: DateTime<Utc>,
    pub state: SessionState,
    pub adapter_metadata: AdapterMetadata,
}

impl Session {
    /// Attempt the `self.state -> next` transition, returning a
    /// [`crate::ErrorKind::Contract`] if it violates the monotonic
    /// invariant.
    pub fn transition(&mut self, next: SessionState) -> Result<(), crate::ErrorKind> {
        if !self.state.can_transition_to(next) {
            return Err(crate::ErrorKind::contract(format!(
                "cannot transition session {} from {} to {}",
                self.id, self.state, next
            )));
        }
        self.state = next;
        Ok(())
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
