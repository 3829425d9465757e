// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use teleclaude_core::test_support::session_fixture;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn session_with_chat_id() -> Session {
    let mut session = session_fixture("demo");
    session
        .adapter_metadata
        .set("telegram", serde_json::json!({"chat_id": "12345"}));
    session
}

#[tokio::test]
async fn first_call_posts_second_call_edits() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/bottest-token/sendMessage"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "ok": true,
            "result": {"message_id": 99}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/bottest-token/editMessageText"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let adapter = TelegramAdapter::new("test-token").with_api_base(server.uri());
    let session = session_with_chat_id();
    let now = Utc::now();

    let first = adapter
        .send_output_update(&session, None, "hi", now, now)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(first["message_id"], 99);

    let second = adapter
        .send_output_update(&session, Some(&first), "hi, edited", now, now)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(second["message_id"], 99);
}

#[tokio::test]
async fn missing_chat_id_is_a_contract_error() {
    let adapter = TelegramAdapter::new("test-token");
    let session = session_fixture("demo");
    let now = Utc::now();
    let err = adapter
        .send_output_update(&session, None, "hi", now, now)
        .await
        .unwrap_err();
    assert_eq!(err.error_class(), "contract_error");
}
