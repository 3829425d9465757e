// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Notification projections (spec §4.5): written by the pipeline's
//! mandatory Notification Projector cartridge, resolved by domain
//! cartridges or by a human through the control plane.

use crate::error::StoreError;
use crate::pool::Store;
use chrono::{DateTime, Utc};
use sqlx::Row;
use std::str::FromStr;
use teleclaude_core::{AgentStatus, EnvelopeId, NotificationId, NotificationRow};

impl Store {
    /// Insert-if-absent on `idempotency_key`. Returns `None` when a
    /// notification already exists for this key — the projector is
    /// expected to call this unconditionally on every matching envelope
    /// and rely on the uniqueness constraint for coalescing.
    pub async fn project_notification(
        &self,
        idempotency_key: &str,
        group_key: &str,
        envelope_id: &EnvelopeId,
        summary: &str,
        payload: serde_json::Value,
    ) -> Result<Option<NotificationId>, StoreError> {
        let id = NotificationId::new();
        let result = sqlx::query(
            "INSERT INTO notifications \
             (id, idempotency_key, group_key, envelope_id, summary, \
              agent_status, payload) \
             VALUES (?1, ?2, ?3, ?4, ?5, 'none', ?6)",
        )
        .bind(id.to_string())
        .bind(idempotency_key)
        .bind(group_key)
        .bind(envelope_id.to_string())
        .bind(summary)
        .bind(&payload)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(Some(id)),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn claim_notification(
        &self,
        id: &NotificationId,
        claimed_by: &str,
    ) -> Result<(), StoreError> {
        sqlx::query(
            "UPDATE notifications SET agent_status = 'claimed', claimed_by = ?1 \
             WHERE id = ?2",
        )
        .bind(claimed_by)
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn resolve_notification(
        &self,
        id: &NotificationId,
        resolved_by: &str,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        sqlx::query(
            "UPDATE notifications \
             SET agent_status = 'resolved', resolved_by = ?1, resolved_at = ?2 \
             WHERE id = ?3",
        )
        .bind(resolved_by)
        .bind(now)
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn list_open_notifications(&self) -> Result<Vec<NotificationRow>, StoreError> {
        let rows = sqlx::query("SELECT * FROM notifications WHERE agent_status != 'resolved'")
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(row_to_notification).collect()
    }

    /// Looks up the notification coalesced under `idempotency_key`, for
    /// domain cartridges that need to resolve or re-claim the
    /// notification their envelope originally projected.
    pub async fn find_notification_by_idempotency_key(
        &self,
        idempotency_key: &str,
    ) -> Result<Option<NotificationRow>, StoreError> {
        let row = sqlx::query("SELECT * FROM notifications WHERE idempotency_key = ?1")
            .bind(idempotency_key)
            .fetch_optional(&self.pool)
            .await?;
        row.map(row_to_notification).transpose()
    }
}

fn row_to_notification(row: sqlx::sqlite::SqliteRow) -> Result<NotificationRow, StoreError> {
    let id_raw: String = row.try_get("id")?;
    let envelope_id_raw: String = row.try_get("envelope_id")?;
    let agent_status_raw: String = row.try_get("agent_status")?;

    Ok(NotificationRow {
        id: NotificationId::from_str(&id_raw).map_err(|e| StoreError::Corrupt(format!("bad id: {e}")))?,
        idempotency_key: row.try_get("idempotency_key")?,
        group_key: row.try_get("group_key")?,
        envelope_id: EnvelopeId::from_str(&envelope_id_raw)
            .map_err(|e| StoreError::Corrupt(format!("bad envelope_id: {e}")))?,
        summary: row.try_get("summary")?,
        agent_status: AgentStatus::from_str(&agent_status_raw)
            .map_err(|e| StoreError::Corrupt(e.to_string()))?,
        claimed_by: row.try_get("claimed_by")?,
        resolved_by: row.try_get("resolved_by")?,
        resolved_at: row.try_get("resolved_at")?,
        payload: row.try_get("payload")?,
    })
}

#[cfg(test)]
#[path = "notifications_tests.rs"]
mod tests;
