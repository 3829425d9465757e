// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `tmux`-backed [`MuxBridge`] (spec §4.7): sessions created with
//! `tmux new-session -d`, keys sent with `tmux send-keys`, panes read
//! with `tmux capture-pane`. Every invocation goes through [`run_tmux`]
//! so the guard installation (spec §4.7) has a single execution surface
//! to protect.

use crate::bridge::{MuxBridge, MuxError};
use crate::guard::install_guard;
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::process::Command;
use tracing::{debug, warn};

/// Bracketed-paste delimiters wrapped around injected text so the
/// receiving shell treats it as literal input rather than re-interpreting
/// control sequences (spec §4.3 step 6).
const BRACKETED_PASTE_START: &str = "\x1b[200~";
const BRACKETED_PASTE_END: &str = "\x1b[201~";

pub struct TmuxBridge {
    guard_dir: PathBuf,
}

impl TmuxBridge {
    /// Installs the forbidden-operations guard under `state_dir/guard`
    /// and returns a bridge that prepends it to every session's `PATH`.
    pub fn new(state_dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let guard_dir = install_guard(state_dir.into().join("guard"))?;
        Ok(Self { guard_dir })
    }

    fn guarded_path(&self) -> String {
        let real_path = std::env::var("PATH").unwrap_or_default();
        format!("{}:{}", self.guard_dir.display(), real_path)
    }
}

/// Runs `tmux` with `args`, returning stdout on success. A non-zero exit
/// that looks like "no such session" is classified distinctly from other
/// subprocess failures so callers can decide whether to recreate headless
/// sessions (spec §4.7 failure semantics).
async fn run_tmux(args: &[&str]) -> Result<String, MuxError> {
    debug!(?args, "running tmux");
    let output = Command::new("tmux")
        .args(args)
        .output()
        .await
        .map_err(|e| MuxError::SubprocessFailed(format!("spawning tmux failed: {e}")))?;

    if output.status.success() {
        return Ok(String::from_utf8_lossy(&output.stdout).into_owned());
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    if stderr.contains("can't find session") || stderr.contains("session not found") {
        return Err(MuxError::SessionMissing(stderr.trim().to_string()));
    }
    Err(MuxError::SubprocessFailed(stderr.trim().to_string()))
}

#[async_trait]
impl MuxBridge for TmuxBridge {
    async fn create_session(&self, name: &str, workdir: &str) -> Result<(), MuxError> {
        run_tmux(&["new-session", "-d", "-s", name, "-c", workdir]).await?;
        // Guard the PATH before any user input reaches the shell.
        let export = format!("export PATH=\"{}\"", self.guarded_path());
        run_tmux(&["send-keys", "-t", name, &export, "Enter"]).await?;
        Ok(())
    }

    async fn session_exists(&self, name: &str) -> Result<bool, MuxError> {
        match run_tmux(&["has-session", "-t", name]).await {
            Ok(_) => Ok(true),
            Err(MuxError::SessionMissing(_)) => Ok(false),
            Err(other) => Err(other),
        }
    }

    async fn send_keys(&self, name: &str, text: &str) -> Result<(), MuxError> {
        let wrapped = format!("{BRACKETED_PASTE_START}{text}{BRACKETED_PASTE_END}");
        run_tmux(&["send-keys", "-t", name, &wrapped, "Enter"]).await?;
        Ok(())
    }

    async fn capture_pane(&self, name: &str) -> Result<String, MuxError> {
        run_tmux(&["capture-pane", "-t", name, "-p", "-S", "-"]).await
    }

    async fn kill_session(&self, name: &str) -> Result<(), MuxError> {
        match run_tmux(&["kill-session", "-t", name]).await {
            Ok(_) | Err(MuxError::SessionMissing(_)) => Ok(()),
            Err(other) => {
                warn!(session = name, error = %other, "failed to kill multiplexer session");
                Err(other)
            }
        }
    }
}
