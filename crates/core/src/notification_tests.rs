// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn only_resolved_closes_a_notification() {
    let mut row = NotificationRow {
        id: NotificationId::new(),
        idempotency_key: "k".to_string(),
        group_key: "g".to_string(),
        envelope_id: EnvelopeId::new(),
        summary: "s".to_string(),
        agent_status: AgentStatus::Claimed,
        claimed_by: Some("alice".to_string()),
        resolved_by: None,
        resolved_at: None,
        payload: serde_json::json!({}),
    };
    assert!(row.is_open());
    row.agent_status = AgentStatus::Resolved;
    assert!(!row.is_open());
}
