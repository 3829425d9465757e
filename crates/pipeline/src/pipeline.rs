// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `Pipeline`: runs an envelope through an ordered list of cartridges
//! (spec §4.5), short-circuiting the moment any cartridge drops it.

use crate::cartridge::Cartridge;
use crate::context::Context;
use teleclaude_core::{ErrorKind, EventEnvelope};
use tracing::debug;

pub struct Pipeline {
    cartridges: Vec<Box<dyn Cartridge>>,
}

impl Pipeline {
    pub fn new(cartridges: Vec<Box<dyn Cartridge>>) -> Self {
        Self { cartridges }
    }

    /// Runs `envelope` through every cartridge in order. Returns `Ok(None)`
    /// if some cartridge suppressed it along the way, or propagates the
    /// first cartridge error (the caller decides whether that error is
    /// retryable via [`ErrorKind::is_retryable`]).
    pub async fn run(&self, envelope: EventEnvelope, context: &Context) -> Result<Option<EventEnvelope>, ErrorKind> {
        let mut current = envelope;
        for cartridge in &self.cartridges {
            match cartridge.process(current, context).await? {
                Some(next) => current = next,
                None => {
                    debug!(cartridge = cartridge.name(), "envelope suppressed");
                    return Ok(None);
                }
            }
        }
        Ok(Some(current))
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
