// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Generic CAS-claim / fetch-pending / cleanup primitives shared by the
//! inbound queue and outbound outbox tables — both have the same shape
//! (`id`, `status`, `next_retry_at`, `locked_at`, `created_at`), so the
//! mutual-exclusion and scheduling logic lives here once and the
//! table-specific modules only add row mapping and business fields.

use crate::error::StoreError;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

/// Compare-and-set claim: sets `locked_at = now` only if the row is
/// unlocked or its lock is older than `lock_cutoff`. `table` is always a
/// compile-time constant from this crate, never caller-supplied, so
/// interpolating it into the query string carries no injection risk.
pub(crate) async fn claim(
    pool: &SqlitePool,
    table: &'static str,
    row_id: i64,
    now: DateTime<Utc>,
    lock_cutoff: DateTime<Utc>,
) -> Result<bool, StoreError> {
    let sql = format!(
        "UPDATE {table} SET locked_at = ?1 \
         WHERE id = ?2 AND (locked_at IS NULL OR locked_at <= ?3)"
    );
    let result = sqlx::query(&sql)
        .bind(now)
        .bind(row_id)
        .bind(lock_cutoff)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Returns up to `limit` ids with `status in (pending, failed)`,
/// `next_retry_at <= now` (or null), and an unlocked or stale lock, in
/// strict id-ascending order.
pub(crate) async fn fetch_pending_ids(
    pool: &SqlitePool,
    table: &'static str,
    now: DateTime<Utc>,
    lock_cutoff: DateTime<Utc>,
    limit: i64,
) -> Result<Vec<i64>, StoreError> {
    let sql = format!(
        "SELECT id FROM {table} \
         WHERE status IN ('pending', 'failed') \
           AND (next_retry_at IS NULL OR next_retry_at <= ?1) \
           AND (locked_at IS NULL OR locked_at <= ?2) \
         ORDER BY id ASC LIMIT ?3"
    );
    let rows: Vec<(i64,)> = sqlx::query_as(&sql)
        .bind(now)
        .bind(lock_cutoff)
        .bind(limit)
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(|(id,)| id).collect())
}

/// Deletes terminal rows (`delivered` or `expired`) older than `cutoff`.
/// Idempotent: a second call with the same cutoff deletes nothing.
pub(crate) async fn cleanup(
    pool: &SqlitePool,
    table: &'static str,
    cutoff: DateTime<Utc>,
) -> Result<u64, StoreError> {
    let sql = format!(
        "DELETE FROM {table} \
         WHERE status IN ('delivered', 'expired') AND created_at < ?1"
    );
    let result = sqlx::query(&sql).bind(cutoff).execute(pool).await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
