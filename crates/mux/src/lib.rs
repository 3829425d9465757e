// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! teleclaude-mux: the Multiplexer Bridge and Session Registry (spec
//! §4.7).
//!
//! [`MuxBridge`] is the trait every mutating multiplexer command goes
//! through; [`tmux::TmuxBridge`] is the concrete `tmux`-backed
//! implementation. [`SessionManager`] combines a `MuxBridge` with the
//! Durable Store to give `create_session` / `send_keys` / `close_session`
//! / `poll_output` a single call site each, and keeps the in-memory
//! [`registry::SessionRegistry`] that the control plane's identity
//! cross-check (spec §4.6) and the delivery primitive's gate-wait (spec
//! §4.3) both read.

mod bridge;
mod guard;
mod manager;
mod registry;
mod tmux;

#[cfg(any(test, feature = "test-support"))]
mod fake;

pub use bridge::{MuxBridge, MuxError};
pub use guard::{install_guard, GUARD_SCRIPT_NAME};
pub use manager::SessionManager;
pub use registry::SessionRegistry;
pub use tmux::TmuxBridge;

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeMuxBridge;

/// Derives the unforgeable multiplexer session name for a session id.
/// Used as the trust anchor in the control plane's identity cross-check:
/// a caller cannot forge this string without already knowing the session
/// id the daemon assigned.
pub fn session_name(id: &teleclaude_core::SessionId) -> String {
    format!("tc-{id}")
}
