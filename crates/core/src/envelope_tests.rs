// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn sample() -> EventEnvelope {
    EventEnvelope {
        envelope_id: EnvelopeId::new(),
        event_type: "domain.todo.prepare_artifact".to_string(),
        payload: serde_json::json!({}),
        group_key: "todo-42".to_string(),
        idempotency_key: "todo-42-prepare".to_string(),
        produced_at: Utc::now(),
        producer_id: "pipeline".to_string(),
    }
}

#[test]
fn area_and_verb_split_the_dotted_namespace() {
    let envelope = sample();
    assert_eq!(envelope.area(), Some("todo"));
    assert_eq!(envelope.verb(), Some("prepare_artifact"));
}

#[test]
fn malformed_type_yields_no_verb() {
    let mut envelope = sample();
    envelope.event_type = "domain".to_string();
    assert_eq!(envelope.verb(), None);
}
