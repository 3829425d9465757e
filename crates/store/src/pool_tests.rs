// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::tempdir;

#[tokio::test]
async fn open_creates_a_database_file_and_applies_the_schema() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("teleclaude.db");

    let store = Store::open(&db_path).await.unwrap();
    assert!(db_path.exists());

    // A second open against the same file should not fail re-applying
    // the schema (every statement is `CREATE ... IF NOT EXISTS`).
    drop(store);
    Store::open(&db_path).await.unwrap();
}
