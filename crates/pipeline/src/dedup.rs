// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The mandatory Dedup cartridge (spec §4.5 step 1): drop an envelope
//! whose `idempotency_key` has already been processed by this pipeline,
//! independent of whether it ever produced a notification.

use crate::cartridge::Cartridge;
use crate::context::Context;
use async_trait::async_trait;
use teleclaude_core::{ErrorKind, EventEnvelope};
use tracing::debug;

pub struct DedupCartridge;

#[async_trait]
impl Cartridge for DedupCartridge {
    fn name(&self) -> &str {
        "dedup"
    }

    async fn process(
        &self,
        envelope: EventEnvelope,
        context: &Context,
    ) -> Result<Option<EventEnvelope>, ErrorKind> {
        let first_time = context
            .store
            .mark_envelope_processed(&envelope.idempotency_key, context.now)
            .await
            .map_err(|e| e.into_core())?;

        if first_time {
            Ok(Some(envelope))
        } else {
            debug!(idempotency_key = %envelope.idempotency_key, "envelope deduped");
            Ok(None)
        }
    }
}

#[cfg(test)]
#[path = "dedup_tests.rs"]
mod tests;
