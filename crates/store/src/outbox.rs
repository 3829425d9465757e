// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Outbound outbox operations (spec §4.4): one row per fanout delivery of
//! an envelope to a target adapter, or `None` for broadcast.

use crate::error::StoreError;
use crate::pool::Store;
use crate::queue;
use chrono::{DateTime, Utc};
use sqlx::Row;
use std::str::FromStr;
use teleclaude_core::{EnvelopeId, OutboxRow, OutboxStatus};

const TABLE: &str = "outbox";

impl Store {
    pub async fn enqueue_outbox(
        &self,
        envelope_id: &EnvelopeId,
        target_adapter: Option<&str>,
        payload: serde_json::Value,
        now: DateTime<Utc>,
    ) -> Result<i64, StoreError> {
        let result = sqlx::query(
            "INSERT INTO outbox (envelope_id, target_adapter, payload, status, created_at) \
             VALUES (?1, ?2, ?3, 'pending', ?4)",
        )
        .bind(envelope_id.to_string())
        .bind(target_adapter)
        .bind(&payload)
        .bind(now)
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    pub async fn claim_outbox(
        &self,
        row_id: i64,
        now: DateTime<Utc>,
        lock_cutoff: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let claimed = queue::claim(&self.pool, TABLE, row_id, now, lock_cutoff).await?;
        if claimed {
            sqlx::query("UPDATE outbox SET status = 'processing' WHERE id = ?1")
                .bind(row_id)
                .execute(&self.pool)
                .await?;
        }
        Ok(claimed)
    }

    pub async fn fetch_pending_outbox(
        &self,
        limit: i64,
        now: DateTime<Utc>,
        lock_cutoff: DateTime<Utc>,
    ) -> Result<Vec<OutboxRow>, StoreError> {
        let ids = queue::fetch_pending_ids(&self.pool, TABLE, now, lock_cutoff, limit).await?;
        let mut rows = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(row) = sqlx::query("SELECT * FROM outbox WHERE id = ?1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?
            {
                rows.push(row_to_outbox(row)?);
            }
        }
        Ok(rows)
    }

    pub async fn mark_outbox_delivered(&self, row_id: i64) -> Result<(), StoreError> {
        sqlx::query("UPDATE outbox SET status = 'delivered' WHERE id = ?1")
            .bind(row_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn mark_outbox_failed(
        &self,
        row_id: i64,
        error: &str,
        attempts: u32,
        next_retry_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        sqlx::query(
            "UPDATE outbox \
             SET status = 'failed', last_error = ?1, attempts = ?2, \
                 next_retry_at = ?3, locked_at = NULL \
             WHERE id = ?4",
        )
        .bind(error)
        .bind(attempts)
        .bind(next_retry_at)
        .bind(row_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn mark_outbox_expired(&self, row_id: i64, error: &str) -> Result<(), StoreError> {
        sqlx::query(
            "UPDATE outbox SET status = 'expired', last_error = ?1, locked_at = NULL \
             WHERE id = ?2",
        )
        .bind(error)
        .bind(row_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn cleanup_outbox(&self, cutoff: DateTime<Utc>) -> Result<u64, StoreError> {
        queue::cleanup(&self.pool, TABLE, cutoff).await
    }
}

fn row_to_outbox(row: sqlx::sqlite::SqliteRow) -> Result<OutboxRow, StoreError> {
    let status_raw: String = row.try_get("status")?;
    let envelope_id_raw: String = row.try_get("envelope_id")?;

    Ok(OutboxRow {
        id: row.try_get("id")?,
        envelope_id: EnvelopeId::from_str(&envelope_id_raw)
            .map_err(|e| StoreError::Corrupt(format!("bad envelope_id: {e}")))?,
        target_adapter: row.try_get("target_adapter")?,
        payload: row.try_get("payload")?,
        status: OutboxStatus::from_str(&status_raw).map_err(|e| StoreError::Corrupt(e.to_string()))?,
        attempts: row.try_get::<i64, _>("attempts")? as u32,
        next_retry_at: row.try_get("next_retry_at")?,
        last_error: row.try_get("last_error")?,
        locked_at: row.try_get("locked_at")?,
        created_at: row.try_get("created_at")?,
    })
}

#[cfg(test)]
#[path = "outbox_tests.rs"]
mod tests;
