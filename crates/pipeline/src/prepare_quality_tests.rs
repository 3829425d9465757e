// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::sync::Arc;
use teleclaude_core::test_support::envelope_fixture;
use teleclaude_store::Store;
use tempfile::tempdir;

fn artifact_envelope(sections: serde_json::Value) -> EventEnvelope {
    let mut envelope = envelope_fixture(EVENT_TYPE_PREFIX, "todo-1");
    envelope.payload = serde_json::json!({
        "artifact_path": "todo-1/artifact.json",
        "sections": sections,
    });
    envelope
}

#[tokio::test]
async fn complete_artifact_resolves_the_notification() {
    let dir = tempdir().unwrap();
    let store = Arc::new(Store::open_in_memory().await.unwrap());
    let envelope = artifact_envelope(serde_json::json!({
        "summary": "does the thing",
        "acceptance_criteria": "- works\n- is tested",
        "risks": "none known",
    }));
    store
        .project_notification(
            &envelope.idempotency_key,
            &envelope.group_key,
            &envelope.envelope_id,
            "s",
            serde_json::json!({}),
        )
        .await
        .unwrap();

    let context = Context::new(store.clone(), dir.path(), envelope.produced_at);
    let cartridge = PrepareQualityCartridge;
    let result = cartridge.process(envelope.clone(), &context).await.unwrap();
    assert!(result.is_some());

    let open = store.list_open_notifications().await.unwrap();
    assert!(open.is_empty(), "a fully scored artifact should resolve its notification");

    let report_path = dir.path().join("todo-1/report.json");
    assert!(report_path.exists());
}

#[tokio::test]
async fn missing_section_gets_one_structural_fix_and_stays_claimed() {
    let dir = tempdir().unwrap();
    let store = Arc::new(Store::open_in_memory().await.unwrap());
    let envelope = artifact_envelope(serde_json::json!({
        "summary": "does the thing",
    }));
    store
        .project_notification(
            &envelope.idempotency_key,
            &envelope.group_key,
            &envelope.envelope_id,
            "s",
            serde_json::json!({}),
        )
        .await
        .unwrap();

    let context = Context::new(store.clone(), dir.path(), envelope.produced_at);
    let cartridge = PrepareQualityCartridge;
    cartridge.process(envelope.clone(), &context).await.unwrap();

    let open = store.list_open_notifications().await.unwrap();
    assert_eq!(open.len(), 1, "an incomplete artifact must stay open");
    assert_eq!(open[0].agent_status.to_string(), "claimed");

    let report: serde_json::Value = serde_json::from_slice(
        &tokio::fs::read(dir.path().join("todo-1/report.json")).await.unwrap(),
    )
    .unwrap();
    assert_eq!(report["structural_fix_applied"], "acceptance_criteria");
}

#[tokio::test]
async fn non_matching_event_type_passes_through_untouched() {
    let dir = tempdir().unwrap();
    let store = Arc::new(Store::open_in_memory().await.unwrap());
    let envelope = envelope_fixture("domain.session.created", "s-1");
    let context = Context::new(store, dir.path(), envelope.produced_at);
    let cartridge = PrepareQualityCartridge;

    let result = cartridge.process(envelope.clone(), &context).await.unwrap();
    assert_eq!(result, Some(envelope));
    assert!(!dir.path().join("report.json").exists());
}
