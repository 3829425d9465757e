// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! teleclaude-store: the Durable Store (spec §4.1).
//!
//! A single SQLite database file opened with `journal_mode=WAL` and a
//! 5-second busy-timeout, accessed through `sqlx`. Every mutating
//! operation takes an explicit `now` rather than reading the system clock,
//! so callers can drive retries and lock-cutoff windows deterministically
//! in tests. The CAS `claim`/`fetch_pending`/`cleanup` primitives live in
//! [`queue`] and are shared by the inbound queue and outbound outbox,
//! which differ only in their row shape and business fields.

mod directory;
mod envelopes;
mod error;
mod inbound;
mod notifications;
mod outbox;
mod pool;
mod queue;
mod schema;
mod sessions;

pub use error::StoreError;
pub use pool::{Store, BUSY_TIMEOUT};
