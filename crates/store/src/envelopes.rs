// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Envelope idempotency ledger (spec §4.5): backs the pipeline's
//! mandatory Dedup cartridge, which must drop an envelope whose
//! `idempotency_key` was already processed — independent of whether that
//! envelope ever produced a notification.

use crate::error::StoreError;
use crate::pool::Store;
use chrono::{DateTime, Utc};

impl Store {
    /// Records `idempotency_key` as processed. Returns `true` if this
    /// call recorded it for the first time, `false` if it was already
    /// present (the Dedup cartridge's drop signal).
    pub async fn mark_envelope_processed(
        &self,
        idempotency_key: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "INSERT INTO processed_envelopes (idempotency_key, processed_at) VALUES (?1, ?2)",
        )
        .bind(idempotency_key)
        .bind(now)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(true),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => Ok(false),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
#[path = "envelopes_tests.rs"]
mod tests;
