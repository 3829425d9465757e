// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon crate.

use std::path::PathBuf;
use std::time::Duration;

use crate::lifecycle::LifecycleError;
use teleclaude_core::ComputerId;

/// Daemon version string baked into startup logs and the version file.
pub const DAEMON_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Resolve state directory: `TC_STATE_DIR` > `XDG_STATE_HOME/teleclaude` >
/// `~/.local/state/teleclaude`.
pub fn state_dir() -> Result<PathBuf, LifecycleError> {
    if let Ok(dir) = std::env::var("TC_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("teleclaude"));
    }
    let home = std::env::var("HOME").map_err(|_| LifecycleError::NoStateDir)?;
    Ok(PathBuf::from(home).join(".local/state/teleclaude"))
}

/// Explicit computer id override, for deployments that assign ids
/// externally rather than letting the daemon mint and persist its own on
/// first startup (spec glossary: "computer" is the unit a daemon
/// instance represents).
pub fn computer_id_override() -> Option<ComputerId> {
    std::env::var("TC_COMPUTER_ID").ok().and_then(|s| s.parse().ok())
}

/// Discord bot token, when the Discord adapter should be registered.
pub fn discord_bot_token() -> Option<String> {
    std::env::var("TC_DISCORD_BOT_TOKEN").ok().filter(|s| !s.is_empty())
}

/// Telegram bot token, when the Telegram adapter should be registered.
pub fn telegram_bot_token() -> Option<String> {
    std::env::var("TC_TELEGRAM_BOT_TOKEN").ok().filter(|s| !s.is_empty())
}

/// Peer daemon name, when a peer-to-peer adapter should be registered
/// (spec §2's multi-computer orchestration: "this computer's name as
/// known to the others").
pub fn peer_name() -> Option<String> {
    std::env::var("TC_PEER_NAME").ok().filter(|s| !s.is_empty())
}

/// Number of competing-consumer outbox workers (spec §4.4). Default
/// matches the inbound queue's expectation of modest concurrency per
/// daemon instance.
pub fn outbox_worker_count() -> usize {
    std::env::var("TC_OUTBOX_WORKERS")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(4)
}

/// Pane output poll interval override (spec §4.4).
pub fn output_poll_interval_ms() -> Option<Duration> {
    std::env::var("TC_OUTPUT_POLL_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
}

/// Shutdown drain timeout (default 5s, configurable via `TC_DRAIN_TIMEOUT_MS`).
pub fn drain_timeout() -> Duration {
    std::env::var("TC_DRAIN_TIMEOUT_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_secs(5))
}
