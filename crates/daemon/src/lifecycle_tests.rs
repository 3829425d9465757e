// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::tempdir;

#[test]
#[serial_test::serial]
fn config_load_honors_tc_state_dir_override() {
    let dir = tempdir().unwrap();
    std::env::set_var("TC_STATE_DIR", dir.path());
    let config = Config::load().unwrap();
    std::env::remove_var("TC_STATE_DIR");

    assert_eq!(config.state_dir, dir.path());
    assert_eq!(config.socket_path, dir.path().join("daemon.sock"));
    assert_eq!(config.db_path, dir.path().join("teleclaude.db"));
}

#[test]
#[serial_test::serial]
fn resolve_computer_id_persists_across_calls() {
    let dir = tempdir().unwrap();
    std::env::set_var("TC_STATE_DIR", dir.path());
    let config = Config::load().unwrap();
    std::env::remove_var("TC_STATE_DIR");

    let first = resolve_computer_id(&config).unwrap();
    let second = resolve_computer_id(&config).unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
#[serial_test::serial]
async fn startup_fails_with_lock_failed_when_already_locked() {
    let dir = tempdir().unwrap();
    std::env::set_var("TC_STATE_DIR", dir.path());
    let config = Config::load().unwrap();
    std::env::remove_var("TC_STATE_DIR");

    std::fs::create_dir_all(&config.state_dir).unwrap();
    let holder = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .open(&config.lock_path)
        .unwrap();
    holder.try_lock_exclusive().unwrap();

    let err = startup(&config).await.err().unwrap();
    assert!(matches!(err, LifecycleError::LockFailed(_)));
}
