// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `Context`: what a [`crate::Cartridge`] is handed alongside its
//! envelope (spec §4.5) — the Store's public contract, a known workspace
//! root for file-writing domain cartridges, and the instant the pipeline
//! run started.

use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::sync::Arc;
use teleclaude_store::Store;

/// Domain cartridges "may read/write files in a known workspace (never
/// the Store internals)" (spec §4.5) — `workspace_root` is that
/// boundary. A cartridge must not escape it.
#[derive(Clone)]
pub struct Context {
    pub store: Arc<Store>,
    pub workspace_root: PathBuf,
    pub now: DateTime<Utc>,
}

impl Context {
    pub fn new(store: Arc<Store>, workspace_root: impl Into<PathBuf>, now: DateTime<Utc>) -> Self {
        Self {
            store,
            workspace_root: workspace_root.into(),
            now,
        }
    }
}
