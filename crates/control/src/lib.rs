// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The HTTP control plane (spec §4.6): a Unix-domain-socket-bound JSON
//! API backend functions and operator CLIs use to drive sessions,
//! todos, directory state, and fanout, behind the dual-factor identity
//! cross-check and role clearance checks described in `identity` and
//! `role`.

mod error;
mod identity;
mod role;
mod routes;
mod server;
mod state;

pub use error::ApiError;
pub use identity::{CallerIdentity, CALLER_SESSION_ID_HEADER, MULTIPLEXER_SESSION_HEADER};
pub use role::RoleRequirement;
pub use routes::router;
pub use server::{app_state, serve};
pub use state::AppState;
