// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `MuxBridge` trait: every mutating multiplexer command goes
//! through exactly one of these entry points, so the delivery primitive's
//! "exactly one call to `send_keys`" rule (spec §4.3) has a single place
//! to hold.

use async_trait::async_trait;
use teleclaude_core::ErrorKind;

/// Failure modes for a `MuxBridge` operation.
#[derive(Debug, thiserror::Error)]
pub enum MuxError {
    /// The multiplexer subprocess did not finish before the caller's
    /// timeout, or returned a non-zero exit unrelated to session
    /// existence. Retryable.
    #[error("multiplexer subprocess failed: {0}")]
    SubprocessFailed(String),

    /// The named session does not exist and the caller did not ask for
    /// recreation. Terminal unless the caller recreates headlessly.
    #[error("multiplexer session not found: {0}")]
    SessionMissing(String),
}

impl MuxError {
    pub fn into_kind(self) -> ErrorKind {
        match self {
            Self::SubprocessFailed(msg) => ErrorKind::transient(msg),
            Self::SessionMissing(name) => {
                ErrorKind::permanent(format!("multiplexer session missing: {name}"))
            }
        }
    }
}

/// Abstraction over the terminal multiplexer hosting agent processes.
/// Implementations must route every mutating command through a wrapper
/// that forbids destructive version-control invocations at the shell
/// level (spec §4.7) — see [`crate::guard`].
#[async_trait]
pub trait MuxBridge: Send + Sync + 'static {
    /// Creates a new multiplexer session named `name`, rooted at
    /// `workdir`, with the forbidden-operations guard installed on its
    /// `PATH`.
    async fn create_session(&self, name: &str, workdir: &str) -> Result<(), MuxError>;

    /// Whether a session named `name` currently exists.
    async fn session_exists(&self, name: &str) -> Result<bool, MuxError>;

    /// Injects `text` into the named session's pane, wrapped in
    /// bracketed-paste delimiters, followed by Enter. Exactly one
    /// invocation per call — no redundant existence checks (spec §4.3
    /// step 6).
    async fn send_keys(&self, name: &str, text: &str) -> Result<(), MuxError>;

    /// Captures the full scrollback of the named session's pane.
    async fn capture_pane(&self, name: &str) -> Result<String, MuxError>;

    /// Kills the named session. Idempotent: killing an already-gone
    /// session is not an error.
    async fn kill_session(&self, name: &str) -> Result<(), MuxError>;
}
