// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::sync::Arc;
use teleclaude_core::test_support::envelope_fixture;
use teleclaude_store::Store;

#[tokio::test]
async fn projects_a_notification_and_passes_the_envelope_through() {
    let store = Arc::new(Store::open_in_memory().await.unwrap());
    let envelope = envelope_fixture("domain.todo.prepare_artifact", "todo-1");
    let context = Context::new(store.clone(), "/tmp", envelope.produced_at);
    let cartridge = NotificationProjectorCartridge;

    let result = cartridge.process(envelope.clone(), &context).await.unwrap();
    assert_eq!(result, Some(envelope.clone()));

    let open = store.list_open_notifications().await.unwrap();
    assert_eq!(open.len(), 1);
    assert_eq!(open[0].idempotency_key, envelope.idempotency_key);
}

#[tokio::test]
async fn coalesces_by_group_key_without_erroring() {
    let store = Arc::new(Store::open_in_memory().await.unwrap());
    let envelope = envelope_fixture("domain.todo.prepare_artifact", "todo-1");
    let context = Context::new(store.clone(), "/tmp", envelope.produced_at);
    let cartridge = NotificationProjectorCartridge;

    cartridge.process(envelope.clone(), &context).await.unwrap();
    let second_pass = cartridge.process(envelope, &context).await.unwrap();
    assert!(second_pass.is_some(), "the projector always passes its envelope through");
    assert_eq!(store.list_open_notifications().await.unwrap().len(), 1);
}
