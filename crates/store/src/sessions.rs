// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session CRUD (spec §3): exactly one record per identifier, unique
//! multiplexer session name per owning computer, monotonic state except
//! `paused <-> active`.

use crate::error::StoreError;
use crate::pool::Store;
use chrono::{DateTime, Utc};
use sqlx::Row;
use std::str::FromStr;
use teleclaude_core::{
    AdapterMetadata, ComputerId, HumanRole, Session, SessionId, SessionState, SystemRole,
};

impl Store {
    pub async fn create_session(&self, session: &Session) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO sessions \
             (id, owning_computer, project_path, multiplexer_session_name, \
              origin_adapter, title, system_role, human_role, created_at, \
              last_activity_at, state, adapter_metadata) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        )
        .bind(session.id.to_string())
        .bind(session.owning_computer.to_string())
        .bind(&session.project_path)
        .bind(&session.multiplexer_session_name)
        .bind(&session.origin_adapter)
        .bind(&session.title)
        .bind(session.system_role.as_wire())
        .bind(session.human_role.as_wire())
        .bind(session.created_at)
        .bind(session.last_activity_at)
        .bind(session.state.as_wire())
        .bind(serde_json::to_value(&session.adapter_metadata)?)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn get_session(&self, id: &SessionId) -> Result<Option<Session>, StoreError> {
        let row = sqlx::query("SELECT * FROM sessions WHERE id = ?1")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.map(row_to_session).transpose()
    }

    /// All sessions, most recently active first — the control plane's
    /// `GET /sessions` listing.
    pub async fn list_sessions(&self) -> Result<Vec<Session>, StoreError> {
        let rows = sqlx::query("SELECT * FROM sessions ORDER BY last_activity_at DESC")
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(row_to_session).collect()
    }

    pub async fn set_session_state(
        &self,
        id: &SessionId,
        state: SessionState,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        sqlx::query("UPDATE sessions SET state = ?1, last_activity_at = ?2 WHERE id = ?3")
            .bind(state.as_wire())
            .bind(now)
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn set_adapter_metadata(
        &self,
        id: &SessionId,
        adapter_name: &str,
        value: serde_json::Value,
    ) -> Result<(), StoreError> {
        let mut session = self
            .get_session(id)
            .await?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        session.adapter_metadata.set(adapter_name, value);
        sqlx::query("UPDATE sessions SET adapter_metadata = ?1 WHERE id = ?2")
            .bind(serde_json::to_value(&session.adapter_metadata)?)
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn touch_session(
        &self,
        id: &SessionId,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        sqlx::query("UPDATE sessions SET last_activity_at = ?1 WHERE id = ?2")
            .bind(now)
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

fn row_to_session(row: sqlx::sqlite::SqliteRow) -> Result<Session, StoreError> {
    let system_role_raw: String = row.try_get("system_role")?;
    let human_role_raw: String = row.try_get("human_role")?;
    let state_raw: String = row.try_get("state")?;
    let owning_computer_raw: String = row.try_get("owning_computer")?;
    let id_raw: String = row.try_get("id")?;
    let adapter_metadata_raw: serde_json::Value = row.try_get("adapter_metadata")?;

    Ok(Session {
        id: SessionId::from_str(&id_raw).map_err(|e| StoreError::Corrupt(format!("bad id: {e}")))?,
        owning_computer: ComputerId::from_str(&owning_computer_raw)
            .map_err(|e| StoreError::Corrupt(format!("bad owning_computer: {e}")))?,
        project_path: row.try_get("project_path")?,
        multiplexer_session_name: row.try_get("multiplexer_session_name")?,
        origin_adapter: row.try_get("origin_adapter")?,
        title: row.try_get("title")?,
        system_role: SystemRole::from_str(&system_role_raw)
            .map_err(|e| StoreError::Corrupt(e.to_string()))?,
        human_role: HumanRole::from_str(&human_role_raw)
            .map_err(|e| StoreError::Corrupt(e.to_string()))?,
        created_at: row.try_get("created_at")?,
        last_activity_at: row.try_get("last_activity_at")?,
        state: SessionState::from_str(&state_raw).map_err(|e| StoreError::Corrupt(e.to_string()))?,
        adapter_metadata: serde_json::from_value(adapter_metadata_raw)
            .map_err(|e| StoreError::Corrupt(format!("bad adapter_metadata: {e}")))?,
    })
}

#[cfg(test)]
#[path = "sessions_tests.rs"]
mod tests;
