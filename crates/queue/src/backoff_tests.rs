// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn grows_exponentially_until_the_cap() {
    assert_eq!(backoff_for(0), Duration::from_secs(2));
    assert_eq!(backoff_for(1), Duration::from_secs(4));
    assert_eq!(backoff_for(2), Duration::from_secs(8));
    assert_eq!(backoff_for(7), Duration::from_secs(256));
}

#[test]
fn caps_at_300_seconds() {
    assert_eq!(backoff_for(8), Duration::from_secs(300));
    assert_eq!(backoff_for(100), Duration::from_secs(300));
}
