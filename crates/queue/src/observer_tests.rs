// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use teleclaude_core::test_support::session_fixture;
use teleclaude_core::{FakeClock, SessionState};
use teleclaude_mux::FakeMuxBridge;

#[tokio::test]
async fn changed_pane_output_enqueues_a_broadcast_outbox_row() {
    let store = Arc::new(Store::open_in_memory().await.unwrap());
    let registry = Arc::new(SessionRegistry::new());
    let bridge = Arc::new(FakeMuxBridge::new());
    let mut session = session_fixture("demo");
    session.state = SessionState::Active;
    bridge.create_session(&session.multiplexer_session_name, &session.project_path).await.unwrap();
    registry.insert(session.clone());
    store.create_session(&session).await.unwrap();

    let observer =
        PaneOutputObserver::new(registry.clone(), bridge.clone(), store.clone(), FakeClock::new())
            .with_poll_interval(Duration::from_millis(20));

    bridge.send_keys(&session.multiplexer_session_name, "hello").await.unwrap();
    observer.ensure_started(session.id).await;

    tokio::time::sleep(Duration::from_millis(100)).await;
    let now = Utc::now();
    let pending = store.fetch_pending_outbox(10, now, now - chrono::Duration::minutes(5)).await.unwrap();
    assert!(!pending.is_empty(), "an output change should enqueue an outbox row");
}

#[tokio::test]
async fn ensure_started_is_idempotent_per_session() {
    let store = Arc::new(Store::open_in_memory().await.unwrap());
    let registry = Arc::new(SessionRegistry::new());
    let bridge = Arc::new(FakeMuxBridge::new());
    let observer =
        PaneOutputObserver::new(registry, bridge, store, FakeClock::new()).with_poll_interval(Duration::from_secs(30));

    let id = SessionId::new();
    observer.ensure_started(id).await;
    observer.ensure_started(id).await;
    assert_eq!(observer.active_count().await, 1);
}
