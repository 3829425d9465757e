// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::fake::FakeMuxBridge;
use teleclaude_core::test_support::person_fixture;
use teleclaude_core::FakeClock;

async fn manager() -> SessionManager<FakeMuxBridge, FakeClock> {
    manager_with_store().await.0
}

async fn manager_with_store() -> (SessionManager<FakeMuxBridge, FakeClock>, Arc<Store>) {
    let store = Arc::new(Store::open_in_memory().await.unwrap());
    let manager = SessionManager::new(
        Arc::new(FakeMuxBridge::new()),
        store.clone(),
        SessionRegistry::new(),
        FakeClock::new(),
    );
    (manager, store)
}

#[tokio::test]
async fn create_then_send_keys_round_trips() {
    let mgr = manager().await;
    let id = mgr
        .create_session(
            ComputerId::new(),
            "/proj",
            "demo",
            "local",
            None,
            Some(SystemRole::Worker),
            Some(HumanRole::Member),
        )
        .await
        .unwrap();

    mgr.send_keys(&id, "hello").await.unwrap();
    let output = mgr.poll_output(&id).await.unwrap();
    assert!(output.contains("hello"));
}

#[tokio::test]
async fn close_session_kills_the_multiplexer_session() {
    let mgr = manager().await;
    let id = mgr
        .create_session(
            ComputerId::new(),
            "/proj",
            "demo",
            "local",
            None,
            Some(SystemRole::Worker),
            Some(HumanRole::Member),
        )
        .await
        .unwrap();

    mgr.close_session(&id).await.unwrap();
    assert!(mgr.send_keys(&id, "too late").await.is_err());
}

#[tokio::test]
async fn send_keys_to_unknown_session_is_a_contract_error() {
    let mgr = manager().await;
    let err = mgr.send_keys(&SessionId::new(), "x").await.unwrap_err();
    assert_eq!(err.error_class(), "contract_error");
}

#[tokio::test]
async fn create_session_defaults_roles_from_the_named_person() {
    let (mgr, store) = manager_with_store().await;
    let mut person = person_fixture("Jamie");
    person.human_role = HumanRole::Admin;
    person.default_system_role = SystemRole::Observer;
    store.register_person(&person).await.unwrap();

    let id = mgr
        .create_session(ComputerId::new(), "/proj", "demo", "local", Some(person.id), None, None)
        .await
        .unwrap();

    let session = mgr.registry().get(&id).unwrap();
    assert_eq!(session.human_role, HumanRole::Admin);
    assert_eq!(session.system_role, SystemRole::Observer);
}

#[tokio::test]
async fn create_session_without_roles_or_a_person_is_a_contract_error() {
    let mgr = manager().await;
    let err = mgr
        .create_session(ComputerId::new(), "/proj", "demo", "local", None, None, None)
        .await
        .unwrap_err();
    assert_eq!(err.error_class(), "contract_error");
}
