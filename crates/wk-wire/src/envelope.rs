// SPDX-License-Identifier: MIT

//! The router's request/response wire shapes.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use wk_core::{ErrorCategory, KitError};

/// Request envelope carried over the router's single named channel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IpcRequest {
    pub name: String,
    #[serde(default)]
    pub payload: Value,
}

impl IpcRequest {
    pub fn new(name: impl Into<String>, payload: Value) -> Self {
        Self { name: name.into(), payload }
    }

    /// Envelope-shape validation: `name` must be a non-empty string.
    pub fn validate(&self) -> Result<(), KitError> {
        if self.name.trim().is_empty() {
            return Err(KitError::validation("request name must not be empty"));
        }
        Ok(())
    }
}

/// Response envelope: the wire shape every handler result (success or
/// failure) is wrapped in before crossing the router channel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IpcResponse {
    /// 0 on success, a category-derived (or handler-chosen) non-zero code otherwise.
    pub code: i32,
    pub message: String,
    #[serde(default)]
    pub data: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<ErrorCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    /// Present only when the router was constructed with `debug: true`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

impl IpcResponse {
    pub fn ok(data: Value) -> Self {
        Self { code: 0, message: "ok".to_string(), data, category: None, details: None, stack: None }
    }

    /// Build an error envelope from a `KitError`, optionally attaching a
    /// debug-only stack trace (only ever populated in development mode —
    /// see `RouterConfig::debug`).
    pub fn from_error(err: &KitError, stack: Option<String>) -> Self {
        Self {
            code: err.category.default_code(),
            message: err.message.clone(),
            data: Value::Null,
            category: Some(err.category),
            details: err.details.clone(),
            stack,
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == 0
    }
}

impl From<KitError> for IpcResponse {
    fn from(err: KitError) -> Self {
        IpcResponse::from_error(&err, None)
    }
}

#[cfg(test)]
#[path = "envelope_tests.rs"]
mod tests;
