// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `FakeAdapter`: records every post/edit it's asked to perform, for unit
//! tests of [`crate::FanoutRegistry`] and of the pipeline (teacher
//! convention: `test-support` feature export).

use crate::Adapter;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use teleclaude_core::{ErrorKind, Session};

pub struct FakeAdapter {
    name: String,
    posts: AtomicU64,
    edits: AtomicU64,
    received: Mutex<Vec<String>>,
}

impl FakeAdapter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            posts: AtomicU64::new(0),
            edits: AtomicU64::new(0),
            received: Mutex::new(Vec::new()),
        }
    }

    pub fn post_count(&self) -> u64 {
        self.posts.load(Ordering::SeqCst)
    }

    pub fn edit_count(&self) -> u64 {
        self.edits.load(Ordering::SeqCst)
    }

    pub fn received(&self) -> Vec<String> {
        self.received.lock().clone()
    }
}

#[async_trait]
impl Adapter for FakeAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    async fn send_output_update(
        &self,
        _session: &Session,
        previous: Option<&serde_json::Value>,
        text: &str,
        _started_at: DateTime<Utc>,
        _last_changed_at: DateTime<Utc>,
    ) -> Result<Option<serde_json::Value>, ErrorKind> {
        self.received.lock().push(text.to_string());
        match previous.and_then(|p| p.get("message_ref")) {
            Some(message_ref) => {
                self.edits.fetch_add(1, Ordering::SeqCst);
                Ok(Some(serde_json::json!({ "message_ref": message_ref })))
            }
            None => {
                let count = self.posts.fetch_add(1, Ordering::SeqCst) + 1;
                Ok(Some(
                    serde_json::json!({ "message_ref": format!("{}-msg-{count}", self.name) }),
                ))
            }
        }
    }
}
