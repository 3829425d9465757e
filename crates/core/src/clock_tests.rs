// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn fake_clock_advances() {
    let clock = FakeClock::new();
    let start = clock.now();
    clock.advance(chrono::Duration::seconds(300));
    assert_eq!(clock.now(), start + chrono::Duration::seconds(300));
}

#[test]
fn fake_clock_set() {
    let clock = FakeClock::new();
    let at = DateTime::UNIX_EPOCH + chrono::Duration::days(1);
    clock.set(at);
    assert_eq!(clock.now(), at);
}
