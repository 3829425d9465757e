// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! teleclaude-adapters: the Adapter Fanout (spec §2, §4.4, §6).
//!
//! [`Adapter`] is the single trait every transport implements; the
//! `adapter_metadata` a session carries in its [`teleclaude_core::Session`]
//! record is namespaced by adapter name and written only by the adapter
//! that owns it. [`FanoutRegistry`] broadcasts one outbound update to
//! every registered adapter other than (optionally) an originating one,
//! under the edit-in-place contract: first call posts, subsequent calls
//! edit the same message.

mod discord;
mod fanout;
mod local_ui;
mod peer;
mod telegram;

#[cfg(any(test, feature = "test-support"))]
mod fake;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use teleclaude_core::{ErrorKind, Session};

pub use discord::DiscordAdapter;
pub use fanout::FanoutRegistry;
pub use local_ui::{LocalUiAdapter, LocalUiEvent};
pub use peer::PeerAdapter;
pub use telegram::TelegramAdapter;

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeAdapter;

/// A transport-specific component translating between an external
/// protocol and the core's enqueue/fanout contract (spec glossary).
#[async_trait]
pub trait Adapter: Send + Sync + 'static {
    /// Stable name used as the `origin` on enqueue and as the
    /// `adapter_metadata` namespace key.
    fn name(&self) -> &str;

    /// Edit-in-place broadcast (spec §4.4, §6): the first call for a
    /// session posts a new message and returns the metadata to persist
    /// under this adapter's key; subsequent calls read that persisted
    /// metadata back (via `previous`) and edit the same message.
    /// Adapters without a natural edit primitive (e.g. peer-daemon)
    /// return `Ok(None)` — a no-op, per spec §4.4.
    async fn send_output_update(
        &self,
        session: &Session,
        previous: Option<&serde_json::Value>,
        text: &str,
        started_at: DateTime<Utc>,
        last_changed_at: DateTime<Utc>,
    ) -> Result<Option<serde_json::Value>, ErrorKind>;
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod lib_tests;
