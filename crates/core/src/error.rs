// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error-kind taxonomy shared across the daemon.
//!
//! `ErrorKind` is deliberately a single enum covering every fallible
//! boundary rather than a type per crate: workers classify an exception
//! into one of these kinds to decide retry behavior, and the control plane
//! maps the same kinds to HTTP status codes. Domain and worker code never
//! imports an HTTP type — only [`ErrorKind::status_code`] knows about
//! status codes, and only the control plane crate calls it.

/// Classification of a failure, independent of the underlying cause.
///
/// Variants carry a `message` for the human-readable half of the
/// control-plane error body; the machine-readable half is the variant
/// name itself (`error_class()`).
#[derive(Debug, Clone, thiserror::Error)]
pub enum ErrorKind {
    /// Caller violated a precondition. Fatal to the caller; never retried.
    #[error("contract violation: {message}")]
    Contract { message: String },

    /// A dependency (multiplexer, Store, chat platform) is temporarily
    /// unavailable. Retryable by the owning worker with backoff.
    #[error("transient dependency failure: {message}")]
    TransientDependency { message: String },

    /// Delivery cannot succeed regardless of retry. Terminal for the row.
    #[error("permanent delivery failure: {message}")]
    PermanentDelivery { message: String },

    /// Dual-factor identity cross-check failed.
    #[error("identity mismatch: {message}")]
    Identity { message: String },

    /// Caller authenticated but lacks the required role clearance.
    #[error("role not cleared: {message}")]
    Role { message: String },
}

impl ErrorKind {
    pub fn contract(message: impl Into<String>) -> Self {
        Self::Contract {
            message: message.into(),
        }
    }

    pub fn transient(message: impl Into<String>) -> Self {
        Self::TransientDependency {
            message: message.into(),
        }
    }

    pub fn permanent(message: impl Into<String>) -> Self {
        Self::PermanentDelivery {
            message: message.into(),
        }
    }

    pub fn identity(message: impl Into<String>) -> Self {
        Self::Identity {
            message: message.into(),
        }
    }

    pub fn role(message: impl Into<String>) -> Self {
        Self::Role {
            message: message.into(),
        }
    }

    /// True if the per-session worker should apply backoff and retry
    /// rather than mark the row terminal.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::TransientDependency { .. })
    }

    /// Machine-readable class, stable across releases — this is what gets
    /// logged and returned in a control-plane error body alongside the
    /// human-readable message.
    pub const fn error_class(&self) -> &'static str {
        match self {
            Self::Contract { .. } => "contract_error",
            Self::TransientDependency { .. } => "transient_dependency_error",
            Self::PermanentDelivery { .. } => "permanent_delivery_error",
            Self::Identity { .. } => "identity_error",
            Self::Role { .. } => "role_error",
        }
    }

    /// HTTP status code for this kind. Only the control plane boundary
    /// (`teleclaude-control`) should ever call this.
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Contract { .. } => 400,
            Self::TransientDependency { .. } => 503,
            Self::PermanentDelivery { .. } => 422,
            Self::Identity { .. } | Self::Role { .. } => 403,
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
