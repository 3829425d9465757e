// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `TelegramAdapter`: speaks to the Telegram Bot API over `reqwest`.
//! `send_output_update` posts with `sendMessage` on the first call and
//! edits with `editMessageText` on subsequent calls, per the edit-in-place
//! contract (spec §4.4, §6).

use crate::Adapter;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use teleclaude_core::{ErrorKind, Session};

pub struct TelegramAdapter {
    name: String,
    bot_token: String,
    client: reqwest::Client,
    api_base: String,
}

#[derive(Deserialize)]
struct SendMessageResult {
    result: SentMessage,
}

#[derive(Deserialize)]
struct SentMessage {
    message_id: i64,
}

impl TelegramAdapter {
    pub fn new(bot_token: impl Into<String>) -> Self {
        Self {
            name: "telegram".to_string(),
            bot_token: bot_token.into(),
            client: reqwest::Client::new(),
            api_base: "https://api.telegram.org".to_string(),
        }
    }

    /// Overrides the API base URL — used by tests against a `wiremock`
    /// server.
    #[cfg(any(test, feature = "test-support"))]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{method}", self.api_base, self.bot_token)
    }

    fn chat_id(&self, session: &Session) -> Result<String, ErrorKind> {
        session
            .adapter_metadata
            .get(&self.name)
            .and_then(|v| v.get("chat_id"))
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .ok_or_else(|| {
                ErrorKind::contract(format!(
                    "session {} has no telegram chat_id in adapter_metadata",
                    session.id
                ))
            })
    }
}

#[async_trait]
impl Adapter for TelegramAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    async fn send_output_update(
        &self,
        session: &Session,
        previous: Option<&serde_json::Value>,
        text: &str,
        _started_at: DateTime<Utc>,
        _last_changed_at: DateTime<Utc>,
    ) -> Result<Option<serde_json::Value>, ErrorKind> {
        let chat_id = self.chat_id(session)?;
        let existing_message_id = previous.and_then(|p| p.get("message_id")).and_then(|v| v.as_i64());

        let response = if let Some(message_id) = existing_message_id {
            self.client
                .post(self.method_url("editMessageText"))
                .json(&serde_json::json!({
                    "chat_id": chat_id,
                    "message_id": message_id,
                    "text": text,
                }))
                .send()
                .await
                .map_err(|e| ErrorKind::transient(format!("telegram editMessageText: {e}")))?;
            response.error_for_status().map_err(|e| {
                ErrorKind::transient(format!("telegram editMessageText failed: {e}"))
            })?;
            serde_json::json!({ "chat_id": chat_id, "message_id": message_id })
        } else {
            let response = self
                .client
                .post(self.method_url("sendMessage"))
                .json(&serde_json::json!({ "chat_id": chat_id, "text": text }))
                .send()
                .await
                .map_err(|e| ErrorKind::transient(format!("telegram sendMessage: {e}")))?
                .error_for_status()
                .map_err(|e| ErrorKind::transient(format!("telegram sendMessage failed: {e}")))?;
            let body: SendMessageResult = response
                .json()
                .await
                .map_err(|e| ErrorKind::transient(format!("telegram response decode: {e}")))?;
            serde_json::json!({ "chat_id": chat_id, "message_id": body.result.message_id })
        };

        Ok(Some(response))
    }
}

#[cfg(test)]
#[path = "telegram_tests.rs"]
mod tests;
