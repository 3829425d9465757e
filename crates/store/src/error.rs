// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors surfaced by the Durable Store.

/// Failure modes for a `Store` operation. `Busy` is the only variant
/// callers treat as retryable — it maps to
/// [`teleclaude_core::ErrorKind::TransientDependency`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// SQLite's `busy_timeout` elapsed before the write lock was granted.
    #[error("store busy: {0}")]
    Busy(String),

    /// A row referenced by id does not exist.
    #[error("row not found: {0}")]
    NotFound(String),

    /// An enum column held a string that does not parse to a known wire
    /// literal, or similar data-shape violation.
    #[error("corrupt row: {0}")]
    Corrupt(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("json encoding error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StoreError {
    pub fn into_core(self) -> teleclaude_core::ErrorKind {
        match self {
            Self::Busy(msg) => teleclaude_core::ErrorKind::transient(msg),
            Self::Database(ref err) if is_busy(err) => {
                teleclaude_core::ErrorKind::transient(self.to_string())
            }
            other => teleclaude_core::ErrorKind::permanent(other.to_string()),
        }
    }
}

fn is_busy(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db_err) if db_err.message().to_lowercase().contains("busy")
    )
}
