// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared helper for the wire-literal enums used across the data model.
//!
//! Every enum column is stored and transmitted as its exact-string wire
//! literal (e.g. `"pending"`, `"help-desk"`) and parsed back through a
//! `FromStr`/`Display` pair, so the stored literal and the wire literal
//! never drift apart.

/// Returned by a wire-literal enum's `FromStr` impl when the string does
/// not match any known variant — typically surfaces to callers as
/// [`crate::error::ErrorKind::Contract`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {type_name} variant: {value:?}")]
pub struct UnknownVariant {
    type_name: &'static str,
    value: String,
}

impl UnknownVariant {
    pub fn new(type_name: &'static str, value: impl Into<String>) -> Self {
        Self {
            type_name,
            value: value.into(),
        }
    }
}
