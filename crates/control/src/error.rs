// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ApiError`: the only place in this crate allowed to know about HTTP
//! status codes (spec §4.6, §7) — domain and worker code never imports
//! one. Converts a caught [`ErrorKind`] plus the two control-plane-local
//! cases (missing identity, unknown resource) spec §6 names but `ErrorKind`
//! has no variant for.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use teleclaude_core::ErrorKind;

#[derive(Debug)]
pub enum ApiError {
    /// `Caller-Session-Id` header absent, malformed, or naming a session
    /// that does not exist. Spec §4.6: "Missing session → 401".
    MissingIdentity,
    /// No route or resource matches the request path.
    NotFound,
    /// Malformed request body or query string — a control-plane-local
    /// contract violation that never reaches a backend function.
    BadRequest(String),
    Domain(ErrorKind),
}

impl From<ErrorKind> for ApiError {
    fn from(err: ErrorKind) -> Self {
        Self::Domain(err)
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error_class: &'static str,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_class, message) = match self {
            Self::MissingIdentity => (StatusCode::UNAUTHORIZED, "missing_identity", "no caller identity".to_string()),
            Self::NotFound => (StatusCode::NOT_FOUND, "not_found", "unknown resource".to_string()),
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, "bad_request", message),
            Self::Domain(kind) => {
                let status =
                    StatusCode::from_u16(kind.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                (status, kind.error_class(), kind.to_string())
            }
        };

        (status, Json(ErrorBody { error_class, message })).into_response()
    }
}
