// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn delivered_and_expired_are_terminal() {
    assert!(InboundStatus::Delivered.is_terminal());
    assert!(InboundStatus::Expired.is_terminal());
    assert!(!InboundStatus::Pending.is_terminal());
    assert!(!InboundStatus::Processing.is_terminal());
    assert!(!InboundStatus::Failed.is_terminal());
}

#[test]
fn message_type_wire_round_trip() {
    for mt in [
        MessageType::Text,
        MessageType::Voice,
        MessageType::File,
        MessageType::Keys,
    ] {
        assert_eq!(mt.to_string().parse::<MessageType>().unwrap(), mt);
    }
}
