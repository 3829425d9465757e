// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use teleclaude_core::test_support::session_fixture;

#[test]
fn insert_then_get_round_trips() {
    let registry = SessionRegistry::new();
    let session = session_fixture("demo");
    registry.insert(session.clone());
    assert_eq!(registry.get(&session.id), Some(session));
}

#[test]
fn update_is_a_no_op_after_removal() {
    let registry = SessionRegistry::new();
    let mut session = session_fixture("demo");
    registry.insert(session.clone());
    registry.remove(&session.id);

    session.title = "renamed".to_string();
    registry.update(session.clone());
    assert_eq!(registry.get(&session.id), None);
}
