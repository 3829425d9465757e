// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::sync::Arc;
use teleclaude_core::test_support::envelope_fixture;
use teleclaude_store::Store;

#[tokio::test]
async fn second_envelope_with_same_idempotency_key_is_dropped() {
    let store = Arc::new(Store::open_in_memory().await.unwrap());
    let envelope = envelope_fixture("domain.todo.prepare_artifact", "todo-1");
    let context = Context::new(store, "/tmp", envelope.produced_at);
    let cartridge = DedupCartridge;

    let first = cartridge.process(envelope.clone(), &context).await.unwrap();
    assert!(first.is_some());

    let second = cartridge.process(envelope, &context).await.unwrap();
    assert!(second.is_none());
}
