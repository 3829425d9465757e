// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn second_projection_with_same_key_is_coalesced() {
    let store = Store::open_in_memory().await.unwrap();
    let envelope_id = EnvelopeId::new();
    let first = store
        .project_notification("todo-1:prepare", "todo-1", &envelope_id, "s", serde_json::json!({}))
        .await
        .unwrap();
    assert!(first.is_some());

    let second = store
        .project_notification("todo-1:prepare", "todo-1", &envelope_id, "s", serde_json::json!({}))
        .await
        .unwrap();
    assert!(second.is_none());
}

#[tokio::test]
async fn resolved_notifications_drop_out_of_the_open_list() {
    let store = Store::open_in_memory().await.unwrap();
    let envelope_id = EnvelopeId::new();
    let id = store
        .project_notification("k", "g", &envelope_id, "s", serde_json::json!({}))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(store.list_open_notifications().await.unwrap().len(), 1);
    store.resolve_notification(&id, "agent", Utc::now()).await.unwrap();
    assert_eq!(store.list_open_notifications().await.unwrap().len(), 0);
}
