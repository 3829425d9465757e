// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Opaque identifier types.
//!
//! Sessions are identified by an opaque 128-bit identifier (spec §3); we
//! use UUID v4 for that and for the other Store-assigned entity ids.
//! Envelopes need a time-ordered id (spec §3: "ULID-like time-ordered") so
//! they get their own wrapper around [`ulid::Ulid`].

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! define_uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Generate a new random id.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }
    };
}

define_uuid_id!(
    /// Identifies a [`crate::Session`].
    SessionId
);
define_uuid_id!(
    /// Identifies a row projected into `notifications`.
    NotificationId
);
define_uuid_id!(
    /// Identifies a computer (daemon instance) row.
    ComputerId
);
define_uuid_id!(
    /// Identifies a project row.
    ProjectId
);
define_uuid_id!(
    /// Identifies a channel row.
    ChannelId
);
define_uuid_id!(
    /// Identifies a person row — the identity behind a human caller.
    PersonId
);

/// Identifies an [`crate::EventEnvelope`]. Time-ordered so envelope ids sort
/// the same as their `produced_at` timestamp, without needing a separate
/// column for that ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnvelopeId(pub ulid::Ulid);

impl EnvelopeId {
    pub fn new() -> Self {
        Self(ulid::Ulid::new())
    }
}

impl Default for EnvelopeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EnvelopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EnvelopeId {
    type Err = ulid::DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(ulid::Ulid::from_str(s)?))
    }
}

impl Borrow<ulid::Ulid> for EnvelopeId {
    fn borrow(&self) -> &ulid::Ulid {
        &self.0
    }
}

#[cfg(test)]
#[path = "ids_tests.rs"]
mod tests;
