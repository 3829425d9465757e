// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dual-factor identity cross-check (spec §4.6): every request carries a
//! `Caller-Session-Id` header naming the session the backend functions act
//! on, and an optional `Multiplexer-Session` header the calling CLI
//! obtained from the multiplexer server itself as an attestation. A
//! mismatch between the two is never trusted — the header alone is
//! writable by the agent.

use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use std::str::FromStr;
use teleclaude_core::{Clock, ErrorKind, Session, SessionId};
use teleclaude_mux::MuxBridge;
use teleclaude_queue::{OutputObserver, TypingIndicator};

pub const CALLER_SESSION_ID_HEADER: &str = "Caller-Session-Id";
pub const MULTIPLEXER_SESSION_HEADER: &str = "Multiplexer-Session";

/// The session a request has been verified to act as. Handlers call
/// [`CallerIdentity::require`] with their endpoint's
/// [`crate::role::RoleRequirement`] before touching any business state.
pub struct CallerIdentity {
    pub session: Session,
}

impl CallerIdentity {
    pub fn require(&self, requirement: crate::role::RoleRequirement) -> Result<(), ApiError> {
        requirement.check(&self.session).map_err(ApiError::from)
    }
}

#[axum::async_trait]
impl<M, C, O, T> FromRequestParts<AppState<M, C, O, T>> for CallerIdentity
where
    M: MuxBridge,
    C: Clock,
    O: OutputObserver,
    T: TypingIndicator,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<M, C, O, T>,
    ) -> Result<Self, Self::Rejection> {
        let claimed_id = parts
            .headers
            .get(CALLER_SESSION_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::MissingIdentity)?;
        let session_id =
            SessionId::from_str(claimed_id).map_err(|_| ApiError::MissingIdentity)?;

        let session = state
            .store
            .get_session(&session_id)
            .await
            .map_err(|e| ApiError::from(e.into_core()))?
            .ok_or(ApiError::MissingIdentity)?;

        if let Some(attested) = parts
            .headers
            .get(MULTIPLEXER_SESSION_HEADER)
            .and_then(|v| v.to_str().ok())
        {
            if attested != session.multiplexer_session_name {
                return Err(ApiError::from(ErrorKind::identity(format!(
                    "multiplexer attestation {attested} does not match session {}'s {}",
                    session.id, session.multiplexer_session_name
                ))));
            }
        }

        Ok(CallerIdentity { session })
    }
}
