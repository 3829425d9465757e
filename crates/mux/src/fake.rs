// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `FakeMuxBridge`: an in-memory `MuxBridge` for tests that never shell
//! out to a real `tmux` binary (teacher convention: `test-support`
//! feature export, see `teleclaude_core::test_support`).

use crate::bridge::{MuxBridge, MuxError};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;

#[derive(Default)]
pub struct FakeMuxBridge {
    panes: Mutex<HashMap<String, String>>,
}

impl FakeMuxBridge {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MuxBridge for FakeMuxBridge {
    async fn create_session(&self, name: &str, _workdir: &str) -> Result<(), MuxError> {
        self.panes.lock().insert(name.to_string(), String::new());
        Ok(())
    }

    async fn session_exists(&self, name: &str) -> Result<bool, MuxError> {
        Ok(self.panes.lock().contains_key(name))
    }

    async fn send_keys(&self, name: &str, text: &str) -> Result<(), MuxError> {
        let mut panes = self.panes.lock();
        let pane = panes
            .get_mut(name)
            .ok_or_else(|| MuxError::SessionMissing(name.to_string()))?;
        pane.push_str(text);
        pane.push('\n');
        Ok(())
    }

    async fn capture_pane(&self, name: &str) -> Result<String, MuxError> {
        self.panes
            .lock()
            .get(name)
            .cloned()
            .ok_or_else(|| MuxError::SessionMissing(name.to_string()))
    }

    async fn kill_session(&self, name: &str) -> Result<(), MuxError> {
        self.panes.lock().remove(name);
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
