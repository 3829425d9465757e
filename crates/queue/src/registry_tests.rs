// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn second_registration_for_same_session_is_rejected() {
    let registry = WorkerRegistry::new();
    let session_id = SessionId::new();

    let first = tokio::spawn(async {
        tokio::time::sleep(std::time::Duration::from_secs(60)).await;
    });
    assert!(registry.try_register(session_id, first).await);

    let second = tokio::spawn(async {});
    assert!(!registry.try_register(session_id, second).await);
    assert_eq!(registry.len().await, 1);
}

#[tokio::test]
async fn deregister_allows_a_fresh_worker() {
    let registry = WorkerRegistry::new();
    let session_id = SessionId::new();
    let handle = tokio::spawn(async {});
    registry.try_register(session_id, handle).await;
    registry.deregister(&session_id).await;

    let second = tokio::spawn(async {});
    assert!(registry.try_register(session_id, second).await);
}
