// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Directory CRUD: computers, projects, people, and channels (spec §3).
//! Simple insert/list pairs — the control plane's `computers`,
//! `projects`, and `channels` clusters are thin listings over these, not
//! workflow engines.

use crate::error::StoreError;
use crate::pool::Store;
use chrono::{DateTime, Utc};
use sqlx::Row;
use std::str::FromStr;
use teleclaude_core::{
    Channel, ChannelId, Computer, ComputerId, HumanRole, Person, PersonId, Project, ProjectId,
    SystemRole,
};

impl Store {
    pub async fn register_computer(&self, computer: &Computer) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO computers (id, hostname, label, last_seen_at) VALUES (?1, ?2, ?3, ?4) \
             ON CONFLICT (id) DO UPDATE SET hostname = excluded.hostname, \
             label = excluded.label, last_seen_at = excluded.last_seen_at",
        )
        .bind(computer.id.to_string())
        .bind(&computer.hostname)
        .bind(&computer.label)
        .bind(computer.last_seen_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn list_computers(&self) -> Result<Vec<Computer>, StoreError> {
        let rows = sqlx::query("SELECT * FROM computers ORDER BY last_seen_at DESC")
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(row_to_computer).collect()
    }

    pub async fn create_project(&self, project: &Project) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO projects (id, path, label) VALUES (?1, ?2, ?3)")
            .bind(project.id.to_string())
            .bind(&project.path)
            .bind(&project.label)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn list_projects(&self) -> Result<Vec<Project>, StoreError> {
        let rows = sqlx::query("SELECT * FROM projects ORDER BY label")
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(row_to_project).collect()
    }

    pub async fn create_channel(&self, channel: &Channel) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO channels (id, adapter_name, external_id, label) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(channel.id.to_string())
        .bind(&channel.adapter_name)
        .bind(&channel.external_id)
        .bind(&channel.label)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn list_channels(&self) -> Result<Vec<Channel>, StoreError> {
        let rows = sqlx::query("SELECT * FROM channels ORDER BY label")
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(row_to_channel).collect()
    }

    pub async fn get_channel(&self, id: &ChannelId) -> Result<Option<Channel>, StoreError> {
        let row = sqlx::query("SELECT * FROM channels WHERE id = ?1")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.map(row_to_channel).transpose()
    }

    pub async fn register_person(&self, person: &Person) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO people (id, display_name, human_role, default_system_role) \
             VALUES (?1, ?2, ?3, ?4) \
             ON CONFLICT (id) DO UPDATE SET display_name = excluded.display_name, \
             human_role = excluded.human_role, \
             default_system_role = excluded.default_system_role",
        )
        .bind(person.id.to_string())
        .bind(&person.display_name)
        .bind(person.human_role.to_string())
        .bind(person.default_system_role.to_string())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn get_person(&self, id: &PersonId) -> Result<Option<Person>, StoreError> {
        let row = sqlx::query("SELECT * FROM people WHERE id = ?1")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.map(row_to_person).transpose()
    }

    pub async fn list_people(&self) -> Result<Vec<Person>, StoreError> {
        let rows = sqlx::query("SELECT * FROM people ORDER BY display_name")
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(row_to_person).collect()
    }
}

fn row_to_computer(row: sqlx::sqlite::SqliteRow) -> Result<Computer, StoreError> {
    let id_raw: String = row.try_get("id")?;
    let last_seen_at: DateTime<Utc> = row.try_get("last_seen_at")?;
    Ok(Computer {
        id: ComputerId::from_str(&id_raw).map_err(|e| StoreError::Corrupt(format!("bad id: {e}")))?,
        hostname: row.try_get("hostname")?,
        label: row.try_get("label")?,
        last_seen_at,
    })
}

fn row_to_project(row: sqlx::sqlite::SqliteRow) -> Result<Project, StoreError> {
    let id_raw: String = row.try_get("id")?;
    Ok(Project {
        id: ProjectId::from_str(&id_raw).map_err(|e| StoreError::Corrupt(format!("bad id: {e}")))?,
        path: row.try_get("path")?,
        label: row.try_get("label")?,
    })
}

fn row_to_channel(row: sqlx::sqlite::SqliteRow) -> Result<Channel, StoreError> {
    let id_raw: String = row.try_get("id")?;
    Ok(Channel {
        id: ChannelId::from_str(&id_raw).map_err(|e| StoreError::Corrupt(format!("bad id: {e}")))?,
        adapter_name: row.try_get("adapter_name")?,
        external_id: row.try_get("external_id")?,
        label: row.try_get("label")?,
    })
}

fn row_to_person(row: sqlx::sqlite::SqliteRow) -> Result<Person, StoreError> {
    let id_raw: String = row.try_get("id")?;
    let human_role_raw: String = row.try_get("human_role")?;
    let system_role_raw: String = row.try_get("default_system_role")?;
    Ok(Person {
        id: PersonId::from_str(&id_raw).map_err(|e| StoreError::Corrupt(format!("bad id: {e}")))?,
        display_name: row.try_get("display_name")?,
        human_role: HumanRole::from_str(&human_role_raw)
            .map_err(|e| StoreError::Corrupt(format!("bad human_role: {e}")))?,
        default_system_role: SystemRole::from_str(&system_role_raw)
            .map_err(|e| StoreError::Corrupt(format!("bad default_system_role: {e}")))?,
    })
}

#[cfg(test)]
#[path = "directory_tests.rs"]
mod tests;
