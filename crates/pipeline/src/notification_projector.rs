// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The mandatory Notification Projector cartridge (spec §4.5 step 2):
//! inserts or coalesces a [`teleclaude_core::NotificationRow`] from every
//! surviving envelope. Always passes the envelope through — only Dedup
//! is allowed to suppress one.

use crate::cartridge::Cartridge;
use crate::context::Context;
use async_trait::async_trait;
use teleclaude_core::{ErrorKind, EventEnvelope};

pub struct NotificationProjectorCartridge;

#[async_trait]
impl Cartridge for NotificationProjectorCartridge {
    fn name(&self) -> &str {
        "notification_projector"
    }

    async fn process(
        &self,
        envelope: EventEnvelope,
        context: &Context,
    ) -> Result<Option<EventEnvelope>, ErrorKind> {
        let summary = envelope
            .payload
            .get("summary")
            .and_then(|v| v.as_str())
            .unwrap_or(&envelope.event_type)
            .to_string();

        context
            .store
            .project_notification(
                &envelope.idempotency_key,
                &envelope.group_key,
                &envelope.envelope_id,
                &summary,
                envelope.payload.clone(),
            )
            .await
            .map_err(|e| e.into_core())?;

        Ok(Some(envelope))
    }
}

#[cfg(test)]
#[path = "notification_projector_tests.rs"]
mod tests;
