// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn broadcast_row_has_no_target_adapter() {
    let store = Store::open_in_memory().await.unwrap();
    let envelope_id = EnvelopeId::new();
    let id = store
        .enqueue_outbox(&envelope_id, None, serde_json::json!({}), Utc::now())
        .await
        .unwrap();

    let now = Utc::now();
    let cutoff = now - chrono::Duration::minutes(5);
    store.claim_outbox(id, now, cutoff).await.unwrap();
    store.mark_outbox_delivered(id).await.unwrap();

    let deleted = store
        .cleanup_outbox(now + chrono::Duration::days(1))
        .await
        .unwrap();
    assert_eq!(deleted, 1);
}
