// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Role taxonomy used by [`crate::Session`] and the control plane's
//! role-clearance matrix.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role a session plays within the daemon's own orchestration (not the
/// identity of the human behind it).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemRole {
    Orchestrator,
    Worker,
    Observer,
    Peer,
}

impl SystemRole {
    pub const fn as_wire(self) -> &'static str {
        match self {
            Self::Orchestrator => "orchestrator",
            Self::Worker => "worker",
            Self::Observer => "observer",
            Self::Peer => "peer",
        }
    }
}

impl fmt::Display for SystemRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

impl FromStr for SystemRole {
    type Err = super::status::UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "orchestrator" => Ok(Self::Orchestrator),
            "worker" => Ok(Self::Worker),
            "observer" => Ok(Self::Observer),
            "peer" => Ok(Self::Peer),
            other => Err(super::status::UnknownVariant::new("SystemRole", other)),
        }
    }
}

/// Role of the human behind a session, independent of `SystemRole`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HumanRole {
    Admin,
    Member,
    Worker,
    HelpDesk,
    Customer,
}

impl HumanRole {
    pub const fn as_wire(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Member => "member",
            Self::Worker => "worker",
            Self::HelpDesk => "help-desk",
            Self::Customer => "customer",
        }
    }
}

impl fmt::Display for HumanRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

impl FromStr for HumanRole {
    type Err = super::status::UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "member" => Ok(Self::Member),
            "worker" => Ok(Self::Worker),
            "help-desk" => Ok(Self::HelpDesk),
            "customer" => Ok(Self::Customer),
            other => Err(super::status::UnknownVariant::new("HumanRole", other)),
        }
    }
}

#[cfg(test)]
#[path = "roles_tests.rs"]
mod tests;
