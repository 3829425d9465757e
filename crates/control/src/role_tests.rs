// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use teleclaude_core::test_support::session_fixture;

#[test]
fn any_allows_every_role() {
    let requirement = RoleRequirement::any();
    let mut session = session_fixture("demo");
    session.system_role = SystemRole::Observer;
    session.human_role = HumanRole::Customer;
    assert!(requirement.check(&session).is_ok());
}

#[test]
fn system_role_mismatch_is_denied() {
    let requirement = RoleRequirement::system(&[SystemRole::Orchestrator]);
    let mut session = session_fixture("demo");
    session.system_role = SystemRole::Worker;
    let err = requirement.check(&session).unwrap_err();
    assert_eq!(err.error_class(), "role_error");
}

#[test]
fn human_role_match_is_allowed() {
    let requirement = RoleRequirement::human(&[HumanRole::Admin, HumanRole::Member]);
    let mut session = session_fixture("demo");
    session.human_role = HumanRole::Member;
    assert!(requirement.check(&session).is_ok());
}

#[yare::parameterized(
    orchestrator_only_allows_orchestrator = { SystemRole::Orchestrator, &[SystemRole::Orchestrator], true },
    orchestrator_only_denies_worker = { SystemRole::Worker, &[SystemRole::Orchestrator], false },
    orchestrator_or_peer_allows_peer = { SystemRole::Peer, &[SystemRole::Orchestrator, SystemRole::Peer], true },
    orchestrator_or_peer_denies_observer = { SystemRole::Observer, &[SystemRole::Orchestrator, SystemRole::Peer], false },
)]
fn system_role_clearance_matrix(session_role: SystemRole, cleared: &'static [SystemRole], allowed: bool) {
    let requirement = RoleRequirement::system(cleared);
    let mut session = session_fixture("demo");
    session.system_role = session_role;
    assert_eq!(requirement.check(&session).is_ok(), allowed);
}
