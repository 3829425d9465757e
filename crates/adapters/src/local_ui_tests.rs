// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use teleclaude_core::test_support::session_fixture;

#[tokio::test]
async fn subscribers_receive_every_update() {
    let adapter = LocalUiAdapter::new("local-ui");
    let mut rx = adapter.subscribe();
    let session = session_fixture("demo");
    let now = Utc::now();

    adapter
        .send_output_update(&session, None, "hi", now, now)
        .await
        .unwrap();

    let event = rx.try_recv().unwrap();
    assert_eq!(event.session_id, session.id);
    assert_eq!(event.text, "hi");
}

#[tokio::test]
async fn no_subscriber_is_not_an_error() {
    let adapter = LocalUiAdapter::new("local-ui");
    let session = session_fixture("demo");
    let now = Utc::now();
    let result = adapter
        .send_output_update(&session, None, "hi", now, now)
        .await;
    assert!(result.is_ok());
}
