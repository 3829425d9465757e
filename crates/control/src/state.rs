// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `AppState`: the startup-constructed context object every handler reads
//! (spec §9's "global singletons map to a startup-constructed context
//! object"). All fields are cheaply clonable handles, never owned
//! connections, so `AppState` itself can be `Clone` without requiring its
//! type parameters to be.

use std::path::PathBuf;
use std::sync::Arc;
use teleclaude_core::Clock;
use teleclaude_mux::{MuxBridge, SessionManager};
use teleclaude_pipeline::Pipeline;
use teleclaude_queue::{InboundQueue, OutputObserver, TypingIndicator};
use teleclaude_store::Store;

pub struct AppState<M: MuxBridge, C: Clock, O: OutputObserver, T: TypingIndicator> {
    pub store: Arc<Store>,
    pub manager: Arc<SessionManager<M, C>>,
    pub inbound: Arc<InboundQueue<M, C, O, T>>,
    /// Event Pipeline driven by the `/events/publish` route (spec §4.5,
    /// §9 Publish operation) — the control plane's only direct caller of
    /// the pipeline; the output-polling observer enqueues outbox rows
    /// directly instead, per spec §4.4's separate "two output sources"
    /// code path.
    pub pipeline: Arc<Pipeline>,
    pub workspace_root: Arc<PathBuf>,
}

impl<M: MuxBridge, C: Clock, O: OutputObserver, T: TypingIndicator> AppState<M, C, O, T> {
    pub fn new(
        store: Arc<Store>,
        manager: Arc<SessionManager<M, C>>,
        inbound: Arc<InboundQueue<M, C, O, T>>,
        pipeline: Arc<Pipeline>,
        workspace_root: Arc<PathBuf>,
    ) -> Self {
        Self { store, manager, inbound, pipeline, workspace_root }
    }
}

impl<M: MuxBridge, C: Clock, O: OutputObserver, T: TypingIndicator> Clone for AppState<M, C, O, T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            manager: self.manager.clone(),
            inbound: self.inbound.clone(),
            pipeline: self.pipeline.clone(),
            workspace_root: self.workspace_root.clone(),
        }
    }
}
