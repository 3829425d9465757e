// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `Cartridge` trait: one stage of the Event Pipeline (spec §4.5).

use crate::context::Context;
use async_trait::async_trait;
use teleclaude_core::{ErrorKind, EventEnvelope};

/// One stage in the ordered pipeline a published envelope flows through.
/// Returning `Ok(None)` drops the envelope; returning `Ok(Some(envelope))`
/// passes it (unmodified, per the pass-through discipline — only the
/// mandatory Dedup cartridge is expected to actually suppress one) to the
/// next cartridge.
#[async_trait]
pub trait Cartridge: Send + Sync + 'static {
    fn name(&self) -> &str;

    async fn process(
        &self,
        envelope: EventEnvelope,
        context: &Context,
    ) -> Result<Option<EventEnvelope>, ErrorKind>;
}
