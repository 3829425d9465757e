// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle: startup, shutdown, and the `Config` both revolve
//! around.
//!
//! Unlike an event-sourced daemon that must replay a WAL before it can
//! answer anything, every piece of TeleClaude's durable state already
//! lives in the Durable Store, so startup here is wiring, not recovery:
//! open the store, rehydrate the in-memory session registry from it,
//! build the adapter fanout, and let [`teleclaude_queue::InboundQueue::startup`]
//! re-spawn workers for sessions with rows still pending.

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use fs2::FileExt;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::info;

use teleclaude_adapters::{DiscordAdapter, FanoutRegistry, LocalUiAdapter, PeerAdapter, TelegramAdapter};
use teleclaude_core::{Computer, ComputerId, SystemClock};
use teleclaude_mux::{SessionManager, SessionRegistry, TmuxBridge};
use teleclaude_pipeline::{DedupCartridge, NotificationProjectorCartridge, Pipeline, PrepareQualityCartridge};
use teleclaude_queue::{InboundQueue, NoopTypingIndicator, OutboxWorkerPool, PaneOutputObserver};
use teleclaude_store::Store;

use crate::env;

/// Concrete types every daemon process wires together. Tests build the
/// same shape with `FakeMuxBridge`/`FakeClock` instead; the generic
/// crates underneath never know the difference.
pub type DaemonBridge = TmuxBridge;
pub type DaemonClock = SystemClock;
pub type DaemonObserver = PaneOutputObserver<DaemonBridge, DaemonClock>;
pub type DaemonInbound = InboundQueue<DaemonBridge, DaemonClock, DaemonObserver, NoopTypingIndicator>;
pub type DaemonAppState = teleclaude_control::AppState<DaemonBridge, DaemonClock, DaemonObserver, NoopTypingIndicator>;

/// Filesystem layout and tunables resolved once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub state_dir: PathBuf,
    pub socket_path: PathBuf,
    pub lock_path: PathBuf,
    pub version_path: PathBuf,
    pub computer_id_path: PathBuf,
    pub log_path: PathBuf,
    pub db_path: PathBuf,
    pub workspace_root: PathBuf,
    pub outbox_worker_count: usize,
}

impl Config {
    /// Loads configuration for the user-level daemon. One daemon serves
    /// every session on this computer.
    pub fn load() -> Result<Self, LifecycleError> {
        let state_dir = env::state_dir()?;
        Ok(Self {
            socket_path: state_dir.join("daemon.sock"),
            lock_path: state_dir.join("daemon.pid"),
            version_path: state_dir.join("daemon.version"),
            computer_id_path: state_dir.join("computer_id"),
            log_path: state_dir.join("daemon.log"),
            db_path: state_dir.join("teleclaude.db"),
            workspace_root: state_dir.join("workspaces"),
            outbox_worker_count: env::outbox_worker_count(),
            state_dir,
        })
    }
}

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("could not determine state directory")]
    NoStateDir,

    #[error("failed to acquire lock: daemon already running?")]
    LockFailed(#[source] std::io::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store error: {0}")]
    Store(#[from] teleclaude_store::StoreError),

    #[error("mux error: {0}")]
    Mux(#[source] std::io::Error),

    #[error("{0}")]
    Queue(#[from] teleclaude_core::ErrorKind),
}

/// Everything `main` needs after a successful startup: the constructed
/// application state to hand to the control plane, and background task
/// handles to abort on shutdown.
pub struct StartupResult {
    pub state: DaemonAppState,
    pub background: Vec<JoinHandle<()>>,
    _lock_file: File,
}

/// Acquires the single-instance lock, opens the store, and wires every
/// component the control plane and queue crates need. Returns
/// `Err(LifecycleError::LockFailed)` if another daemon already holds the
/// lock file — callers should treat that distinctly from other startup
/// failures (spec §5: a daemon restart must not corrupt the running
/// instance's state).
pub async fn startup(config: &Config) -> Result<StartupResult, LifecycleError> {
    std::fs::create_dir_all(&config.state_dir)?;

    let lock_file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(&config.lock_path)?;
    lock_file.try_lock_exclusive().map_err(LifecycleError::LockFailed)?;

    let mut lock_file = lock_file;
    lock_file.set_len(0)?;
    writeln!(lock_file, "{}", std::process::id())?;

    std::fs::write(&config.version_path, env::DAEMON_VERSION)?;
    std::fs::create_dir_all(&config.workspace_root)?;

    let store = Arc::new(Store::open(&config.db_path).await?);

    let computer_id = resolve_computer_id(config)?;
    store
        .register_computer(&Computer {
            id: computer_id,
            hostname: std::env::var("HOSTNAME").unwrap_or_else(|_| "localhost".to_string()),
            label: env::peer_name().unwrap_or_else(|| computer_id.to_string()),
            last_seen_at: chrono::Utc::now(),
        })
        .await?;

    let bridge = Arc::new(TmuxBridge::new(&config.state_dir).map_err(LifecycleError::Mux)?);
    let registry = SessionRegistry::new();
    registry.reload(store.list_sessions().await?);

    let clock = SystemClock;
    let manager = Arc::new(SessionManager::new(bridge.clone(), store.clone(), registry.clone(), clock.clone()));

    let mut fanout_builder = FanoutRegistry::new();
    if let Some(token) = env::discord_bot_token() {
        fanout_builder.register(Arc::new(DiscordAdapter::new(token)));
    }
    if let Some(token) = env::telegram_bot_token() {
        fanout_builder.register(Arc::new(TelegramAdapter::new(token)));
    }
    if let Some(name) = env::peer_name() {
        fanout_builder.register(Arc::new(PeerAdapter::new(name)));
    }
    fanout_builder.register(Arc::new(LocalUiAdapter::new("local_ui")));
    let fanout = Arc::new(fanout_builder);

    let registry_arc = Arc::new(registry.clone());
    let mut observer = PaneOutputObserver::new(registry_arc.clone(), bridge.clone(), store.clone(), clock.clone());
    if let Some(interval) = env::output_poll_interval_ms() {
        observer = observer.with_poll_interval(interval);
    }
    let observer = Arc::new(observer);

    let inbound = Arc::new(InboundQueue::new(
        store.clone(),
        registry_arc,
        bridge.clone(),
        fanout.clone(),
        clock.clone(),
        observer,
        Arc::new(NoopTypingIndicator),
    ));
    let restarted = inbound.startup().await?;
    info!(sessions = restarted, "resumed inbound workers for sessions with pending messages");

    let outbox = Arc::new(OutboxWorkerPool::new(store.clone(), fanout, clock));
    let mut background = outbox.spawn(config.outbox_worker_count);

    let pipeline = Arc::new(Pipeline::new(vec![
        Box::new(DedupCartridge),
        Box::new(NotificationProjectorCartridge),
        Box::new(PrepareQualityCartridge),
    ]));

    let state = teleclaude_control::app_state(store, manager, inbound, pipeline, Arc::new(config.workspace_root.clone()));

    background.shrink_to_fit();
    Ok(StartupResult { state, background, _lock_file: lock_file })
}

/// Resolves this daemon's persistent [`ComputerId`]: an explicit
/// override wins, otherwise the id minted on this computer's first
/// startup is read back from `computer_id_path`, or minted now if this
/// is the first startup.
fn resolve_computer_id(config: &Config) -> Result<ComputerId, LifecycleError> {
    if let Some(id) = env::computer_id_override() {
        return Ok(id);
    }
    if let Ok(existing) = std::fs::read_to_string(&config.computer_id_path) {
        if let Ok(id) = existing.trim().parse() {
            return Ok(id);
        }
    }
    let id = ComputerId::new();
    std::fs::write(&config.computer_id_path, id.to_string())?;
    Ok(id)
}

/// Aborts background workers and releases the lock file (dropped at the
/// end of `main`, but named here so shutdown ordering reads explicitly
/// at the call site).
pub fn shutdown(background: Vec<JoinHandle<()>>) {
    for handle in background {
        handle.abort();
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
