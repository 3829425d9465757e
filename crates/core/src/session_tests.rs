// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn pause_and_resume_are_allowed() {
    assert!(SessionState::Active.can_transition_to(SessionState::Paused));
    assert!(SessionState::Paused.can_transition_to(SessionState::Active));
}

#[test]
fn closed_is_terminal() {
    assert!(!SessionState::Closed.can_transition_to(SessionState::Active));
    assert!(!SessionState::Closed.can_transition_to(SessionState::Initializing));
}

#[test]
fn initializing_cannot_go_straight_to_paused() {
    assert!(!SessionState::Initializing.can_transition_to(SessionState::Paused));
}

#[test]
fn adapter_metadata_is_namespaced_by_adapter() {
    let mut meta = AdapterMetadata::default();
    meta.set("telegram", serde_json::json!({"message_id": 42}));
    assert!(meta.get("discord").is_none());
    assert_eq!(meta.get("telegram").unwrap()["message_id"], 42);
}
