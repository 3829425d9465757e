// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Inbound queue operations (spec §4.1/§4.2): `enqueue`, `claim`,
//! `fetch_pending`, `mark_delivered`, `mark_failed`, `expire_session`,
//! `cleanup`.

use crate::error::StoreError;
use crate::pool::Store;
use crate::queue;
use chrono::{DateTime, Utc};
use sqlx::Row;
use std::str::FromStr;
use teleclaude_core::{InboundRow, InboundStatus, MessageType, SessionId};

const TABLE: &str = "inbound_queue";

impl Store {
    /// Inserts a new inbound row. Returns `Ok(None)` instead of erroring
    /// when `(origin, source_message_id)` already exists — the uniqueness
    /// violation is the deduplication primitive for platform replays, not
    /// a caller error.
    #[allow(clippy::too_many_arguments)]
    pub async fn enqueue_inbound(
        &self,
        session_id: &SessionId,
        origin: &str,
        message_type: MessageType,
        content: &str,
        payload: serde_json::Value,
        actor: &str,
        source_message_id: Option<&str>,
        source_channel_id: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Option<i64>, StoreError> {
        let result = sqlx::query(
            "INSERT INTO inbound_queue \
             (session_id, origin, message_type, content, payload, actor, \
              status, created_at, source_message_id, source_channel_id) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, 'pending', ?7, ?8, ?9)",
        )
        .bind(session_id.to_string())
        .bind(origin)
        .bind(message_type.as_wire())
        .bind(content)
        .bind(&payload)
        .bind(actor)
        .bind(now)
        .bind(source_message_id)
        .bind(source_channel_id)
        .execute(&self.pool)
        .await;

        match result {
            Ok(result) => Ok(Some(result.last_insert_rowid())),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn claim_inbound(
        &self,
        row_id: i64,
        now: DateTime<Utc>,
        lock_cutoff: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let claimed = queue::claim(&self.pool, TABLE, row_id, now, lock_cutoff).await?;
        if claimed {
            sqlx::query("UPDATE inbound_queue SET status = 'processing' WHERE id = ?1")
                .bind(row_id)
                .execute(&self.pool)
                .await?;
        }
        Ok(claimed)
    }

    pub async fn fetch_pending_inbound(
        &self,
        session_id: &SessionId,
        limit: i64,
        now: DateTime<Utc>,
        lock_cutoff: DateTime<Utc>,
    ) -> Result<Vec<InboundRow>, StoreError> {
        let rows = sqlx::query(
            "SELECT * FROM inbound_queue \
             WHERE session_id = ?1 AND status IN ('pending', 'failed') \
               AND (next_retry_at IS NULL OR next_retry_at <= ?2) \
               AND (locked_at IS NULL OR locked_at <= ?3) \
             ORDER BY id ASC LIMIT ?4",
        )
        .bind(session_id.to_string())
        .bind(now)
        .bind(lock_cutoff)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(row_to_inbound).collect()
    }

    pub async fn mark_inbound_delivered(
        &self,
        row_id: i64,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        sqlx::query(
            "UPDATE inbound_queue SET status = 'delivered', processed_at = ?1 \
             WHERE id = ?2",
        )
        .bind(now)
        .bind(row_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn mark_inbound_failed(
        &self,
        row_id: i64,
        error: &str,
        attempt_count: u32,
        next_retry_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        sqlx::query(
            "UPDATE inbound_queue \
             SET status = 'failed', last_error = ?1, attempt_count = ?2, \
                 next_retry_at = ?3, locked_at = NULL \
             WHERE id = ?4",
        )
        .bind(error)
        .bind(attempt_count)
        .bind(next_retry_at)
        .bind(row_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Marks every non-terminal row for `session_id` as `expired`. Used
    /// when a session is closed out from under a running worker.
    pub async fn expire_session_inbound(&self, session_id: &SessionId) -> Result<u64, StoreError> {
        let result = sqlx::query(
            "UPDATE inbound_queue SET status = 'expired' \
             WHERE session_id = ?1 AND status NOT IN ('delivered', 'expired')",
        )
        .bind(session_id.to_string())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Sessions with at least one non-terminal inbound row, for
    /// `startup()`'s worker re-discovery sweep.
    pub async fn sessions_with_pending_inbound(&self) -> Result<Vec<SessionId>, StoreError> {
        let rows = sqlx::query(
            "SELECT DISTINCT session_id FROM inbound_queue \
             WHERE status IN ('pending', 'processing', 'failed')",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                let raw: String = row.try_get("session_id")?;
                SessionId::from_str(&raw)
                    .map_err(|e| StoreError::Corrupt(format!("bad session_id: {e}")))
            })
            .collect()
    }

    pub async fn cleanup_inbound(&self, cutoff: DateTime<Utc>) -> Result<u64, StoreError> {
        queue::cleanup(&self.pool, TABLE, cutoff).await
    }
}

fn row_to_inbound(row: sqlx::sqlite::SqliteRow) -> Result<InboundRow, StoreError> {
    let status_raw: String = row.try_get("status")?;
    let message_type_raw: String = row.try_get("message_type")?;
    let session_id_raw: String = row.try_get("session_id")?;

    Ok(InboundRow {
        id: row.try_get("id")?,
        session_id: SessionId::from_str(&session_id_raw)
            .map_err(|e| StoreError::Corrupt(format!("bad session_id: {e}")))?,
        origin: row.try_get("origin")?,
        message_type: MessageType::from_str(&message_type_raw)
            .map_err(|e| StoreError::Corrupt(e.to_string()))?,
        content: row.try_get("content")?,
        payload: row.try_get("payload")?,
        actor: row.try_get("actor")?,
        status: InboundStatus::from_str(&status_raw)
            .map_err(|e| StoreError::Corrupt(e.to_string()))?,
        created_at: row.try_get("created_at")?,
        processed_at: row.try_get("processed_at")?,
        attempt_count: row.try_get::<i64, _>("attempt_count")? as u32,
        next_retry_at: row.try_get("next_retry_at")?,
        last_error: row.try_get("last_error")?,
        locked_at: row.try_get("locked_at")?,
        source_message_id: row.try_get("source_message_id")?,
        source_channel_id: row.try_get("source_channel_id")?,
    })
}

#[cfg(test)]
#[path = "inbound_tests.rs"]
mod tests;
