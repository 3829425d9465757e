// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::directory::Person;
use crate::envelope::EventEnvelope;
use crate::ids::{ComputerId, EnvelopeId, NotificationId, PersonId, ProjectId, SessionId};
use crate::inbound::{InboundRow, InboundStatus, MessageType};
use crate::notification::{AgentStatus, NotificationRow};
use crate::outbox::{OutboxRow, OutboxStatus};
use crate::roles::{HumanRole, SystemRole};
use crate::session::{AdapterMetadata, Session, SessionState};
use chrono::{DateTime, Utc};

/// A fixed instant used across fixtures so factory output is comparable
/// without threading a clock through every call site.
pub fn fixture_time() -> DateTime<Utc> {
    DateTime::UNIX_EPOCH + chrono::Duration::seconds(1_700_000_000)
}

pub fn session_fixture(title: &str) -> Session {
    Session {
        id: SessionId::new(),
        owning_computer: ComputerId::new(),
        project_path: "/test/project".to_string(),
        multiplexer_session_name: format!("tc-{title}"),
        origin_adapter: "local".to_string(),
        title: title.to_string(),
        system_role: SystemRole::Worker,
        human_role: HumanRole::Member,
        created_at: fixture_time(),
        last_activity_at: fixture_time(),
        state: SessionState::Active,
        adapter_metadata: AdapterMetadata::default(),
    }
}

pub fn project_fixture() -> ProjectId {
    ProjectId::new()
}

pub fn person_fixture(display_name: &str) -> Person {
    Person {
        id: PersonId::new(),
        display_name: display_name.to_string(),
        human_role: HumanRole::Member,
        default_system_role: SystemRole::Worker,
    }
}

pub fn inbound_row_fixture(session_id: SessionId, content: &str) -> InboundRow {
    InboundRow {
        id: 1,
        session_id,
        origin: "telegram".to_string(),
        message_type: MessageType::Text,
        content: content.to_string(),
        payload: serde_json::json!({}),
        actor: "user-1".to_string(),
        status: InboundStatus::Pending,
        created_at: fixture_time(),
        processed_at: None,
        attempt_count: 0,
        next_retry_at: None,
        last_error: None,
        locked_at: None,
        source_message_id: None,
        source_channel_id: None,
    }
}

pub fn envelope_fixture(event_type: &str, group_key: &str) -> EventEnvelope {
    EventEnvelope {
        envelope_id: EnvelopeId::new(),
        event_type: event_type.to_string(),
        payload: serde_json::json!({}),
        group_key: group_key.to_string(),
        idempotency_key: format!("{group_key}:{event_type}"),
        produced_at: fixture_time(),
        producer_id: "test".to_string(),
    }
}

pub fn notification_row_fixture(envelope_id: EnvelopeId, summary: &str) -> NotificationRow {
    NotificationRow {
        id: NotificationId::new(),
        idempotency_key: format!("notif:{envelope_id}"),
        group_key: "test-group".to_string(),
        envelope_id,
        summary: summary.to_string(),
        agent_status: AgentStatus::None,
        claimed_by: None,
        resolved_by: None,
        resolved_at: None,
        payload: serde_json::json!({}),
    }
}

pub fn outbox_row_fixture(envelope_id: EnvelopeId, target_adapter: Option<&str>) -> OutboxRow {
    OutboxRow {
        id: 1,
        envelope_id,
        target_adapter: target_adapter.map(str::to_string),
        payload: serde_json::json!({}),
        status: OutboxStatus::Pending,
        attempts: 0,
        next_retry_at: None,
        last_error: None,
        locked_at: None,
        created_at: fixture_time(),
    }
}
