// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn none_target_adapter_means_broadcast() {
    let row = OutboxRow {
        id: 1,
        envelope_id: EnvelopeId::new(),
        target_adapter: None,
        payload: serde_json::json!({}),
        status: OutboxStatus::Pending,
        attempts: 0,
        next_retry_at: None,
        last_error: None,
        locked_at: None,
        created_at: Utc::now(),
    };
    assert!(row.is_broadcast());
}
