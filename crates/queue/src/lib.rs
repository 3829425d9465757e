// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! teleclaude-queue: the Inbound Queue worker pool (spec §4.2), the
//! delivery primitive (spec §4.3), and the Outbox worker pool (spec
//! §4.4).
//!
//! [`InboundQueue`] owns one drain task per session, spawned on first
//! enqueue and torn down when its row backlog empties; each task's body
//! is [`delivery::deliver_inbound`]. [`OutboxWorkerPool`] is a
//! fixed-size pool of competing consumers draining the shared outbox
//! table, since outbound ordering is only required per
//! `(session, adapter)`, not globally.

pub mod backoff;
pub mod delivery;
pub mod inbound;
mod observer;
mod outbox;
mod registry;

pub use backoff::backoff_for;
pub use delivery::{deliver_inbound, DeliveryContext, NoopObserver, OutputObserver};
pub use inbound::{InboundQueue, NoopTypingIndicator, TypingIndicator};
pub use observer::PaneOutputObserver;
pub use outbox::{DrainOutcome, OutboxWorkerPool};
pub use registry::WorkerRegistry;
