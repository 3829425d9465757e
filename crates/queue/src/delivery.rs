// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `deliver_inbound`: the seven-step delivery primitive (spec §4.3).
//!
//! Every step is unchanged from the specification; the only Rust-specific
//! addition is [`OutputObserver`], a trait the outbox crate implements so
//! step 7 ("ensure the output-polling observer is started") has a call
//! site here without `teleclaude-queue` depending on the outbox worker
//! pool's internals.

use async_trait::async_trait;
use std::time::Duration;
use teleclaude_adapters::FanoutRegistry;
use teleclaude_core::{Clock, ErrorKind, Session, SessionId, SessionState};
use teleclaude_mux::{MuxBridge, SessionRegistry};
use teleclaude_store::Store;

/// Upper bound on step 1's gate-wait while the session is `initializing`
/// (spec §4.3 step 1).
const INITIALIZING_GATE_TIMEOUT: Duration = Duration::from_secs(15);
const INITIALIZING_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Reserved `adapter_metadata` key the delivery primitive writes
/// `last_input_origin`/`last_message_sent` under (spec §4.3 step 4). Not
/// an adapter name — no registered [`teleclaude_adapters::Adapter`] ever
/// reads or writes this key.
const DELIVERY_METADATA_KEY: &str = "_delivery";

/// Started once per session by step 7; implemented by the outbox worker
/// pool so this crate doesn't need to depend on its internals.
#[async_trait]
pub trait OutputObserver: Send + Sync + 'static {
    async fn ensure_started(&self, session_id: SessionId);
}

/// An observer that does nothing, for callers (tests, or a daemon wiring
/// that hasn't started the outbox pool yet) that don't need step 7.
pub struct NoopObserver;

#[async_trait]
impl OutputObserver for NoopObserver {
    async fn ensure_started(&self, _session_id: SessionId) {}
}

pub struct DeliveryContext<'a, M: MuxBridge, C: Clock, O: OutputObserver> {
    pub store: &'a Store,
    pub registry: &'a SessionRegistry,
    pub bridge: &'a M,
    pub fanout: &'a FanoutRegistry,
    pub clock: &'a C,
    pub observer: &'a O,
}

/// Runs the seven-step delivery primitive for one inbound row. `content`
/// and `origin` are taken from the caller's [`teleclaude_core::InboundRow`]
/// rather than the whole row, so callers driving retries don't need to
/// reconstruct a row between attempts.
pub async fn deliver_inbound<M: MuxBridge, C: Clock, O: OutputObserver>(
    session_id: SessionId,
    origin: &str,
    content: &str,
    ctx: &DeliveryContext<'_, M, C, O>,
) -> Result<(), ErrorKind> {
    // Step 1: gate-wait up to 15s while `initializing`.
    let session = wait_until_not_initializing(session_id, ctx).await?;

    // Step 2: verify the multiplexer session is alive; recreate headless.
    ensure_multiplexer_session(&session, ctx).await?;

    // Step 3: break any threaded output state so the next output update
    // is a fresh edit target rather than an edit of stale content.
    reset_adapter_threads(&session, ctx).await?;

    // Step 4: update session metadata (last_input_origin, last_message_sent).
    let now = ctx.clock.now();
    ctx.store
        .set_adapter_metadata(
            &session_id,
            DELIVERY_METADATA_KEY,
            serde_json::json!({ "last_input_origin": origin, "last_message_sent": content }),
        )
        .await
        .map_err(|e| e.into_core())?;

    // Step 5: fanout the input to every adapter other than the originator.
    ctx.fanout
        .broadcast(ctx.store, &session, content, now, now, Some(origin))
        .await;

    // Step 6: exactly one `send_keys` call, no redundant existence check
    // (step 2 already established the session is alive).
    ctx.bridge
        .send_keys(&session.multiplexer_session_name, content)
        .await
        .map_err(|e| e.into_kind())?;

    // Step 7: record activity and ensure the output-polling observer runs.
    ctx.store
        .touch_session(&session_id, now)
        .await
        .map_err(|e| e.into_core())?;
    ctx.observer.ensure_started(session_id).await;

    Ok(())
}

async fn wait_until_not_initializing<M: MuxBridge, C: Clock, O: OutputObserver>(
    session_id: SessionId,
    ctx: &DeliveryContext<'_, M, C, O>,
) -> Result<Session, ErrorKind> {
    let deadline = ctx.clock.now() + chrono::Duration::from_std(INITIALIZING_GATE_TIMEOUT).unwrap();
    loop {
        let session = ctx
            .registry
            .get(&session_id)
            .ok_or_else(|| ErrorKind::contract(format!("unknown session {session_id}")))?;

        if session.state != SessionState::Initializing {
            return Ok(session);
        }
        if ctx.clock.now() >= deadline {
            return Err(ErrorKind::transient(format!(
                "session {session_id} still initializing after {}s",
                INITIALIZING_GATE_TIMEOUT.as_secs()
            )));
        }
        tokio::time::sleep(INITIALIZING_POLL_INTERVAL).await;
    }
}

async fn ensure_multiplexer_session<M: MuxBridge, C: Clock, O: OutputObserver>(
    session: &Session,
    ctx: &DeliveryContext<'_, M, C, O>,
) -> Result<(), ErrorKind> {
    let exists = ctx
        .bridge
        .session_exists(&session.multiplexer_session_name)
        .await
        .map_err(|e| e.into_kind())?;
    if exists {
        return Ok(());
    }
    // Headless recreation: the session record survives, only its backing
    // multiplexer session vanished (e.g. host reboot).
    ctx.bridge
        .create_session(&session.multiplexer_session_name, &session.project_path)
        .await
        .map_err(|e| e.into_kind())
}

async fn reset_adapter_threads<M: MuxBridge, C: Clock, O: OutputObserver>(
    session: &Session,
    ctx: &DeliveryContext<'_, M, C, O>,
) -> Result<(), ErrorKind> {
    for name in ctx.fanout.names() {
        if session.adapter_metadata.get(name).is_some() {
            ctx.store
                .set_adapter_metadata(&session.id, name, serde_json::json!({}))
                .await
                .map_err(|e| e.into_core())?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "delivery_tests.rs"]
mod tests;
