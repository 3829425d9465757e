// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use teleclaude_core::test_support::session_fixture;

#[tokio::test]
async fn round_trips_through_storage() {
    let store = Store::open_in_memory().await.unwrap();
    let session = session_fixture("demo");
    store.create_session(&session).await.unwrap();

    let loaded = store.get_session(&session.id).await.unwrap().unwrap();
    assert_eq!(loaded, session);
}

#[tokio::test]
async fn adapter_metadata_merges_under_its_own_key() {
    let store = Store::open_in_memory().await.unwrap();
    let session = session_fixture("demo");
    store.create_session(&session).await.unwrap();

    store
        .set_adapter_metadata(&session.id, "telegram", serde_json::json!({"message_id": 7}))
        .await
        .unwrap();
    store
        .set_adapter_metadata(&session.id, "discord", serde_json::json!({"message_id": 9}))
        .await
        .unwrap();

    let loaded = store.get_session(&session.id).await.unwrap().unwrap();
    assert_eq!(loaded.adapter_metadata.get("telegram").unwrap()["message_id"], 7);
    assert_eq!(loaded.adapter_metadata.get("discord").unwrap()["message_id"], 9);
}
