// SPDX-License-Identifier: MIT

//! Error taxonomy shared by every subsystem.
//!
//! Components return `Result<T, KitError>`; the router is the single place
//! that turns a `KitError` into the wire [envelope][crate::KitError] shape
//! (see `wk-wire::IpcResponse`).

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error category, mirrored onto the wire envelope's `category` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Permission,
    RateLimit,
    Window,
    Transport,
    Internal,
}

crate::simple_display! {
    ErrorCategory {
        Validation => "VALIDATION",
        NotFound => "NOT_FOUND",
        Permission => "PERMISSION",
        RateLimit => "RATE_LIMIT",
        Window => "WINDOW",
        Transport => "TRANSPORT",
        Internal => "INTERNAL",
    }
}

impl ErrorCategory {
    /// The numeric code conventionally carried alongside this category in
    /// an `IpcResponse` envelope. Handlers may still set a more specific
    /// code; this is only the default used by `From<KitError>`.
    pub fn default_code(self) -> i32 {
        match self {
            ErrorCategory::Validation => 400,
            ErrorCategory::NotFound => 404,
            ErrorCategory::Permission => 403,
            ErrorCategory::RateLimit => 429,
            ErrorCategory::Window => 409,
            ErrorCategory::Transport => 502,
            ErrorCategory::Internal => 500,
        }
    }
}

/// The kit-wide error type. Every fallible public API returns this.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct KitError {
    pub category: ErrorCategory,
    pub message: String,
    pub details: Option<Value>,
}

impl KitError {
    pub fn new(category: ErrorCategory, message: impl Into<String>) -> Self {
        Self { category, message: message.into(), details: None }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Validation, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::NotFound, message)
    }

    pub fn permission(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Permission, message)
    }

    pub fn rate_limit(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::RateLimit, message)
    }

    pub fn window(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Window, message)
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Transport, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Internal, message)
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
