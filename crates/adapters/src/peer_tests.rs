// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use teleclaude_core::test_support::session_fixture;

#[tokio::test]
async fn peer_adapter_never_persists_metadata() {
    let adapter = PeerAdapter::new("peer-danger-room");
    let session = session_fixture("demo");
    let now = Utc::now();
    let result = adapter
        .send_output_update(&session, None, "hi", now, now)
        .await
        .unwrap();
    assert!(result.is_none());
}
