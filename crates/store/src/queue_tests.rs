// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::pool::Store;

async fn seeded_store() -> Store {
    let store = Store::open_in_memory().await.unwrap();
    sqlx::query(
        "INSERT INTO sessions (id, owning_computer, project_path, \
         multiplexer_session_name, origin_adapter, title, system_role, \
         human_role, created_at, last_activity_at, state) \
         VALUES ('s1', 'c1', '/p', 'tc-s1', 'local', 't', 'worker', \
         'member', '2024-01-01T00:00:00Z', '2024-01-01T00:00:00Z', 'active')",
    )
    .execute(&store.pool)
    .await
    .unwrap();
    store
}

#[tokio::test]
async fn claim_fails_on_already_locked_row() {
    let store = seeded_store().await;
    sqlx::query(
        "INSERT INTO inbound_queue (session_id, origin, message_type, \
         content, actor, status, created_at) \
         VALUES ('s1', 'telegram', 'text', 'hi', 'u', 'pending', \
         '2024-01-01T00:00:00Z')",
    )
    .execute(&store.pool)
    .await
    .unwrap();

    let now = Utc::now();
    let cutoff = now - chrono::Duration::minutes(5);
    assert!(claim(&store.pool, "inbound_queue", 1, now, cutoff)
        .await
        .unwrap());
    // Second claim attempt with a cutoff before the lock we just set
    // must fail — the row is still held.
    assert!(!claim(&store.pool, "inbound_queue", 1, now, cutoff)
        .await
        .unwrap());
}

#[tokio::test]
async fn fetch_pending_respects_next_retry_at() {
    let store = seeded_store().await;
    sqlx::query(
        "INSERT INTO inbound_queue (session_id, origin, message_type, \
         content, actor, status, created_at, next_retry_at) \
         VALUES ('s1', 'telegram', 'text', 'hi', 'u', 'failed', \
         '2024-01-01T00:00:00Z', '2999-01-01T00:00:00Z')",
    )
    .execute(&store.pool)
    .await
    .unwrap();

    let now = Utc::now();
    let cutoff = now - chrono::Duration::minutes(5);
    let ids = fetch_pending_ids(&store.pool, "inbound_queue", now, cutoff, 10)
        .await
        .unwrap();
    assert!(ids.is_empty(), "row not yet due for retry must be excluded");
}
