// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Serves the control-plane router over a Unix domain socket (spec §4.6:
//! "filesystem socket, HTTP/1.1, JSON"). `axum` has no built-in Unix
//! listener, so each accepted connection is driven through
//! `hyper_util`'s `TokioIo`/`auto::Builder` the same way the ecosystem
//! serves axum over any non-TCP transport.

use crate::routes::router;
use crate::state::AppState;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as ConnBuilder;
use hyper_util::service::TowerToHyperService;
use std::path::Path;
use std::sync::Arc;
use teleclaude_core::Clock;
use teleclaude_mux::MuxBridge;
use teleclaude_queue::{OutputObserver, TypingIndicator};
use tokio::net::UnixListener;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Binds `socket_path` (removing a stale socket file first) and serves
/// the control plane until `shutdown` is cancelled. Daemon wiring holds
/// the token and cancels it on SIGTERM/SIGINT.
pub async fn serve<M, C, O, T>(
    socket_path: impl AsRef<Path>,
    state: AppState<M, C, O, T>,
    shutdown: CancellationToken,
) -> std::io::Result<()>
where
    M: MuxBridge,
    C: Clock,
    O: OutputObserver,
    T: TypingIndicator,
{
    let socket_path = socket_path.as_ref();
    if socket_path.exists() {
        std::fs::remove_file(socket_path)?;
    }
    let listener = UnixListener::bind(socket_path)?;
    info!(path = %socket_path.display(), "control plane listening");

    let mut make_service = router::<M, C, O, T>().with_state(state).into_make_service();

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            accepted = listener.accept() => {
                match accepted {
                    Ok((stream, _addr)) => {
                        let svc_future = <_ as tower::Service<_>>::call(&mut make_service, ());
                        tokio::spawn(async move {
                            let Ok(svc) = svc_future.await;
                            let io = TokioIo::new(stream);
                            let hyper_svc = TowerToHyperService::new(svc);
                            if let Err(err) = ConnBuilder::new(TokioExecutor::new())
                                .serve_connection_with_upgrades(io, hyper_svc)
                                .await
                            {
                                warn!(error = %err, "control plane connection ended with an error");
                            }
                        });
                    }
                    Err(err) => debug!(error = %err, "unix socket accept error"),
                }
            }
        }
    }

    info!(path = %socket_path.display(), "control plane shut down");
    Ok(())
}

/// Arc-wraps the components a daemon main() constructs once at startup,
/// convenient for passing into [`serve`] without repeating the generic
/// parameter list at every call site.
pub fn app_state<M, C, O, T>(
    store: Arc<teleclaude_store::Store>,
    manager: Arc<teleclaude_mux::SessionManager<M, C>>,
    inbound: Arc<teleclaude_queue::InboundQueue<M, C, O, T>>,
    pipeline: Arc<teleclaude_pipeline::Pipeline>,
    workspace_root: Arc<std::path::PathBuf>,
) -> AppState<M, C, O, T>
where
    M: MuxBridge,
    C: Clock,
    O: OutputObserver,
    T: TypingIndicator,
{
    AppState::new(store, manager, inbound, pipeline, workspace_root)
}
