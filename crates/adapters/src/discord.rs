// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `DiscordAdapter`: speaks to the Discord REST API over `reqwest`.
//! `send_output_update` posts a channel message on the first call and
//! `PATCH`es the same message on subsequent calls, per the edit-in-place
//! contract (spec §4.4, §6).

use crate::Adapter;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use teleclaude_core::{ErrorKind, Session};

pub struct DiscordAdapter {
    name: String,
    bot_token: String,
    client: reqwest::Client,
    api_base: String,
}

#[derive(Deserialize)]
struct DiscordMessage {
    id: String,
}

impl DiscordAdapter {
    pub fn new(bot_token: impl Into<String>) -> Self {
        Self {
            name: "discord".to_string(),
            bot_token: bot_token.into(),
            client: reqwest::Client::new(),
            api_base: "https://discord.com/api/v10".to_string(),
        }
    }

    #[cfg(any(test, feature = "test-support"))]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    fn channel_id(&self, session: &Session) -> Result<String, ErrorKind> {
        session
            .adapter_metadata
            .get(&self.name)
            .and_then(|v| v.get("channel_id"))
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .ok_or_else(|| {
                ErrorKind::contract(format!(
                    "session {} has no discord channel_id in adapter_metadata",
                    session.id
                ))
            })
    }
}

#[async_trait]
impl Adapter for DiscordAdapter {
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
        let channel_id = self.channel_id(session)?;
        let existing_message_id = previous.and_then(|p| p.get("message_id")).and_then(|v| v.as_str());

        let message_id = if let Some(message_id) = existing_message_id {
            self.client
                .patch(format!(
                    "{}/channels/{channel_id}/messages/{message_id}",
                    self.api_base
                ))
                .header("Authorization", format!("Bot {}", self.bot_token))
                .json(&serde_json::json!({ "content": text }))
                .send()
                .await
                .map_err(|e| ErrorKind::transient(format!("discord edit message: {e}")))?
                .error_for_status()
                .map_err(|e| ErrorKind::transient(format!("discord edit message failed: {e}")))?;
            message_id.to_string()
        } else {
            let response = self
                .client
                .post(format!("{}/channels/{channel_id}/messages", self.api_base))
                .header("Authorization", format!("Bot {}", self.bot_token))
                .json(&serde_json::json!({ "content": text }))
                .send()
                .await
                .map_err(|e| ErrorKind::transient(format!("discord post message: {e}")))?
                .error_for_status()
                .map_err(|e| ErrorKind::transient(format!("discord post message failed: {e}")))?;
            let body: DiscordMessage = response
                .json()
                .await
                .map_err(|e| ErrorKind::transient(format!("discord response decode: {e}")))?;
            body.id
        };

        Ok(Some(
            serde_json::json!({ "channel_id": channel_id, "message_id": message_id }),
        ))
    }
}

#[cfg(test)]
#[path = "discord_tests.rs"]
mod tests;
