// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workspace-level end-to-end scenarios, driven entirely through the
//! control plane's HTTP surface with `tower::ServiceExt::oneshot` against
//! an in-process router, the way a CLI or adapter actually talks to the
//! daemon. Fakes stand in for `tmux` and wall-clock time; everything else
//! (store, queue, pipeline, fanout, identity, role checks) is the real
//! crate code.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use teleclaude_adapters::{FakeAdapter, FanoutRegistry};
use teleclaude_control::{router, AppState, CALLER_SESSION_ID_HEADER, MULTIPLEXER_SESSION_HEADER};
use teleclaude_core::test_support::session_fixture;
use teleclaude_core::{FakeClock, HumanRole, MessageType, SessionState, SystemRole};
use teleclaude_mux::{FakeMuxBridge, SessionManager, SessionRegistry};
use teleclaude_pipeline::{Context, DedupCartridge, NotificationProjectorCartridge, Pipeline, PrepareQualityCartridge};
use teleclaude_queue::{InboundQueue, NoopObserver, NoopTypingIndicator};
use teleclaude_store::Store;

type Harness = AppState<FakeMuxBridge, FakeClock, NoopObserver, NoopTypingIndicator>;

/// Wires a full daemon stack against fakes, mirroring
/// `teleclaude_daemon::lifecycle::startup` minus the filesystem and
/// `tmux` dependencies it carries in production.
struct TestDaemon {
    state: Harness,
    store: Arc<Store>,
    bridge: Arc<FakeMuxBridge>,
    registry: Arc<SessionRegistry>,
    adapter: Arc<FakeAdapter>,
}

impl TestDaemon {
    async fn new() -> Self {
        let store = Arc::new(Store::open_in_memory().await.unwrap());
        let bridge = Arc::new(FakeMuxBridge::new());
        let registry = Arc::new(SessionRegistry::new());
        let clock = FakeClock::new();

        let manager = Arc::new(SessionManager::new(
            bridge.clone(),
            store.clone(),
            (*registry).clone(),
            clock.clone(),
        ));

        let adapter = Arc::new(FakeAdapter::new("test_adapter"));
        let mut fanout_builder = FanoutRegistry::new();
        fanout_builder.register(adapter.clone());
        let fanout = Arc::new(fanout_builder);

        let inbound = Arc::new(InboundQueue::new(
            store.clone(),
            registry.clone(),
            bridge.clone(),
            fanout,
            clock,
            Arc::new(NoopObserver),
            Arc::new(NoopTypingIndicator),
        ));

        let pipeline = Arc::new(Pipeline::new(vec![
            Box::new(DedupCartridge),
            Box::new(NotificationProjectorCartridge),
            Box::new(PrepareQualityCartridge),
        ]));

        let state = teleclaude_control::app_state(
            store.clone(),
            manager,
            inbound,
            pipeline,
            Arc::new(std::env::temp_dir()),
        );

        Self { state, store, bridge, registry, adapter }
    }

    /// Creates a session directly against the store and registry,
    /// bypassing `/sessions` so tests can pick exact roles without
    /// needing an orchestrator identity first.
    async fn seed_session(&self, system_role: SystemRole, human_role: HumanRole) -> teleclaude_core::Session {
        let mut session = session_fixture("seeded");
        session.system_role = system_role;
        session.human_role = human_role;
        self.bridge.create_session(&session.multiplexer_session_name, &session.project_path).await.unwrap();
        self.store.create_session(&session).await.unwrap();
        self.registry.insert(session.clone());
        session
    }

    async fn request(
        &self,
        method: &str,
        uri: &str,
        caller: Option<&teleclaude_core::Session>,
        attested_mismatch: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(session) = caller {
            builder = builder.header(CALLER_SESSION_ID_HEADER, session.id.to_string());
            let attestation = attested_mismatch.unwrap_or(&session.multiplexer_session_name);
            builder = builder.header(MULTIPLEXER_SESSION_HEADER, attestation);
        }
        let body = match body {
            Some(value) => {
                builder = builder.header("content-type", "application/json");
                Body::from(serde_json::to_vec(&value).unwrap())
            }
            None => Body::empty(),
        };
        let request = builder.body(body).unwrap();

        let app = router::<FakeMuxBridge, FakeClock, NoopObserver, NoopTypingIndicator>().with_state(self.state.clone());
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
        (status, value)
    }
}

#[tokio::test]
async fn missing_caller_identity_is_rejected_with_401() {
    let daemon = TestDaemon::new().await;
    let (status, body) = daemon.request("GET", "/sessions", None, None, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error_class"], "missing_identity");
}

#[tokio::test]
async fn multiplexer_attestation_mismatch_is_rejected() {
    let daemon = TestDaemon::new().await;
    let caller = daemon.seed_session(SystemRole::Worker, HumanRole::Member).await;

    let (status, body) = daemon.request("GET", "/sessions", Some(&caller), Some("tc-someone-else"), None).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error_class"], "identity_error");
}

#[tokio::test]
async fn role_denied_session_cannot_create_sessions() {
    let daemon = TestDaemon::new().await;
    let caller = daemon.seed_session(SystemRole::Worker, HumanRole::Member).await;

    let (status, body) = daemon
        .request(
            "POST",
            "/sessions",
            Some(&caller),
            None,
            Some(json!({
                "owning_computer": teleclaude_core::ComputerId::new(),
                "project_path": "/tmp/proj",
                "title": "attempt",
                "origin_adapter": "local",
                "system_role": "worker",
                "human_role": "member",
            })),
        )
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error_class"], "role_error");
}

#[tokio::test]
async fn orchestrator_create_send_tail_round_trips_over_http() {
    let daemon = TestDaemon::new().await;
    let orchestrator = daemon.seed_session(SystemRole::Orchestrator, HumanRole::Admin).await;

    let (status, body) = daemon
        .request(
            "POST",
            "/sessions",
            Some(&orchestrator),
            None,
            Some(json!({
                "owning_computer": teleclaude_core::ComputerId::new(),
                "project_path": "/tmp/proj",
                "title": "worker-session",
                "origin_adapter": "local",
                "system_role": "worker",
                "human_role": "member",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let new_session_id: teleclaude_core::SessionId = serde_json::from_value(body).unwrap();

    let created = daemon.store.get_session(&new_session_id).await.unwrap().unwrap();
    daemon.registry.insert(created.clone());

    let (status, body) = daemon
        .request(
            "POST",
            &format!("/sessions/{new_session_id}/send"),
            Some(&created),
            None,
            Some(json!({ "content": "hello from the test" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_number(), "enqueue should return the new row id, got {body}");

    for _ in 0..100 {
        if daemon.bridge.capture_pane(&created.multiplexer_session_name).await.unwrap().contains("hello from the test") {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    let (status, body) = daemon.request("GET", &format!("/sessions/{new_session_id}/tail"), Some(&created), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_str().unwrap().contains("hello from the test"));
}

#[tokio::test]
async fn platform_replay_of_the_same_source_message_id_is_deduped_at_the_http_boundary() {
    let daemon = TestDaemon::new().await;
    let caller = daemon.seed_session(SystemRole::Worker, HumanRole::Member).await;

    let send = |source_message_id: &'static str| {
        json!({
            "content": "duplicate platform callback",
            "source_message_id": source_message_id,
        })
    };

    let (status, first) = daemon
        .request("POST", &format!("/sessions/{}/send", caller.id), Some(&caller), None, Some(send("platform-msg-1")))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(first.is_number());

    let (status, second) = daemon
        .request("POST", &format!("/sessions/{}/send", caller.id), Some(&caller), None, Some(send("platform-msg-1")))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(second.is_null(), "replayed platform message must not enqueue a second row");
}

#[tokio::test]
async fn end_session_requires_orchestrator_role() {
    let daemon = TestDaemon::new().await;
    let worker = daemon.seed_session(SystemRole::Worker, HumanRole::Member).await;

    let (status, _) = daemon.request("POST", &format!("/sessions/{}/end", worker.id), Some(&worker), None, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let orchestrator = daemon.seed_session(SystemRole::Orchestrator, HumanRole::Admin).await;
    let (status, _) = daemon.request("POST", &format!("/sessions/{}/end", worker.id), Some(&orchestrator), None, None).await;
    assert_eq!(status, StatusCode::OK);

    let closed = daemon.store.get_session(&worker.id).await.unwrap().unwrap();
    assert_eq!(closed.state, SessionState::Closed);
}

#[tokio::test]
async fn published_event_projects_a_todo_that_can_be_claimed_and_resolved() {
    let daemon = TestDaemon::new().await;
    let producer = daemon.seed_session(SystemRole::Worker, HumanRole::Member).await;

    let (status, outcome) = daemon
        .request(
            "POST",
            "/events/publish",
            Some(&producer),
            None,
            Some(json!({
                "event_type": "domain.todo.prepare_artifact",
                "payload": { "summary": "prepare release notes" },
                "group_key": "release-1",
                "idempotency_key": "release-1:prepare_artifact",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome, json!(true));

    let (status, todos) = daemon.request("GET", "/todos", Some(&producer), None, None).await;
    assert_eq!(status, StatusCode::OK);
    let todos = todos.as_array().unwrap();
    assert_eq!(todos.len(), 1);
    let todo_id = todos[0]["id"].as_str().unwrap().to_string();

    let (status, _) = daemon.request("POST", &format!("/todos/{todo_id}/claim"), Some(&producer), None, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = daemon.request("POST", &format!("/todos/{todo_id}/resolve"), Some(&producer), None, None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, todos_after) = daemon.request("GET", "/todos", Some(&producer), None, None).await;
    assert!(todos_after.as_array().unwrap().is_empty(), "resolved todo should no longer be open");
}

#[tokio::test]
async fn republishing_the_same_idempotency_key_is_suppressed_by_dedup() {
    let daemon = TestDaemon::new().await;
    let producer = daemon.seed_session(SystemRole::Worker, HumanRole::Member).await;

    let event = json!({
        "event_type": "domain.todo.prepare_artifact",
        "payload": { "summary": "duplicate event" },
        "group_key": "release-2",
        "idempotency_key": "release-2:prepare_artifact",
    });

    let (_, first) = daemon.request("POST", "/events/publish", Some(&producer), None, Some(event.clone())).await;
    assert_eq!(first, json!(true));

    let (_, second) = daemon.request("POST", "/events/publish", Some(&producer), None, Some(event)).await;
    assert_eq!(second, json!(false), "a repeated idempotency key must be dropped by dedup, not re-projected");
}

/// Simulates a daemon restart: a row lands in the Durable Store (via the
/// store directly, as if the prior process had accepted it right before
/// crashing) with no worker ever having run for its session. A freshly
/// constructed `InboundQueue` against the same store and registry must
/// discover and drain it on `startup()`, without the caller re-enqueueing
/// anything (spec §5 restart resilience).
#[tokio::test]
async fn restart_resumes_delivery_of_rows_left_pending_by_a_crashed_process() {
    let store = Arc::new(Store::open_in_memory().await.unwrap());
    let bridge = Arc::new(FakeMuxBridge::new());
    let registry = Arc::new(SessionRegistry::new());
    let clock = FakeClock::new();

    let mut session = session_fixture("restart-target");
    session.state = SessionState::Active;
    bridge.create_session(&session.multiplexer_session_name, &session.project_path).await.unwrap();
    store.create_session(&session).await.unwrap();
    registry.insert(session.clone());

    store
        .enqueue_inbound(
            &session.id,
            "telegram",
            MessageType::Text,
            "left over from before the crash",
            json!({}),
            "user-1",
            None,
            None,
            clock.now(),
        )
        .await
        .unwrap();

    let fanout = Arc::new(FanoutRegistry::new());
    let revived = InboundQueue::new(
        store,
        registry,
        bridge.clone(),
        fanout,
        clock,
        Arc::new(NoopObserver),
        Arc::new(NoopTypingIndicator),
    );

    let resumed = revived.startup().await.unwrap();
    assert_eq!(resumed, 1);

    for _ in 0..100 {
        if bridge.capture_pane(&session.multiplexer_session_name).await.unwrap().contains("left over from before the crash") {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("row left pending across a simulated restart was never delivered");
}

#[tokio::test]
async fn inbound_delivery_fans_out_to_registered_adapters_without_duplicate_posts() {
    let daemon = TestDaemon::new().await;
    let caller = daemon.seed_session(SystemRole::Worker, HumanRole::Member).await;

    let (status, _) = daemon
        .request(
            "POST",
            &format!("/sessions/{}/send", caller.id),
            Some(&caller),
            None,
            Some(json!({ "content": "fan out please" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    for _ in 0..100 {
        if daemon.adapter.post_count() >= 1 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(daemon.adapter.post_count(), 1);
    assert_eq!(daemon.adapter.edit_count(), 0);
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let daemon = TestDaemon::new().await;
    let caller = daemon.seed_session(SystemRole::Worker, HumanRole::Member).await;
    let (status, _) = daemon.request("GET", "/no/such/route", Some(&caller), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
