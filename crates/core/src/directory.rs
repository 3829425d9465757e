// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Directory rows (spec §3): the computers, projects, and channels a
//! session or adapter can be addressed against. Thin value types — no
//! behavior beyond what the control plane needs to list and register
//! them.

use crate::ids::{ChannelId, ComputerId, PersonId, ProjectId};
use crate::roles::{HumanRole, SystemRole};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One daemon instance known to this fabric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Computer {
    pub id: ComputerId,
    pub hostname: String,
    pub label: String,
    pub last_seen_at: DateTime<Utc>,
}

/// One working directory a session can be created against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub path: String,
    pub label: String,
}

/// The identity behind a human caller. `create_session` resolves a
/// caller's `human_role`/`system_role` defaults from here when a
/// `person_id` is given instead of explicit roles (spec §3: "people").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub display_name: String,
    pub human_role: HumanRole,
    pub default_system_role: SystemRole,
}

/// One adapter-owned addressable destination (a chat, a channel, a peer
/// daemon endpoint) a `publish` call can target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub id: ChannelId,
    pub adapter_name: String,
    pub external_id: String,
    pub label: String,
}
