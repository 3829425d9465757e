// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::fake::FakeAdapter;
use teleclaude_core::test_support::session_fixture;

#[tokio::test]
async fn first_call_posts_subsequent_calls_edit() {
    let adapter = FakeAdapter::new("chat");
    let session = session_fixture("demo");
    let now = Utc::now();

    let first = adapter
        .send_output_update(&session, None, "hello", now, now)
        .await
        .unwrap()
        .unwrap();
    let message_ref = first["message_ref"].as_str().unwrap().to_string();

    let second = adapter
        .send_output_update(&session, Some(&first), "hello, edited", now, now)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(second["message_ref"].as_str().unwrap(), message_ref);
    assert_eq!(adapter.post_count(), 1);
    assert_eq!(adapter.edit_count(), 1);
}
