// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `EventEnvelope`: the immutable unit the Event Pipeline processes.
//! Published once, never mutated; every downstream projection (the
//! outbox, the notification table) is derived from a snapshot of an
//! envelope at publish time.

use crate::ids::EnvelopeId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An immutable domain event flowing through the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub envelope_id: EnvelopeId,
    /// Dotted namespace, e.g. `domain.todo.prepare_artifact`.
    pub event_type: String,
    pub payload: serde_json::Value,
    /// Used for notification coalescing and idempotency.
    pub group_key: String,
    pub idempotency_key: String,
    pub produced_at: DateTime<Utc>,
    pub producer_id: String,
}

impl EventEnvelope {
    /// The leading dotted component of `event_type`, e.g. `domain` in
    /// `domain.todo.prepare_artifact`. Cartridges match on this or on the
    /// full type string depending on how specific their interest is.
    pub fn area(&self) -> Option<&str> {
        self.event_type.split('.').nth(1)
    }

    pub fn verb(&self) -> Option<&str> {
        self.event_type.split('.').nth(2)
    }
}

#[cfg(test)]
#[path = "envelope_tests.rs"]
mod tests;
