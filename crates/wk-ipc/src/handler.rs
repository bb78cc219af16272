// SPDX-License-Identifier: MIT

//! The handler contract a host application registers against a request name.

use async_trait::async_trait;
use serde_json::Value;
use wk_core::KitError;

use crate::rate_limit::RateLimitConfig;

/// A registered IPC handler. `call` receives a shallow copy of the router's
/// shared context record alongside the request payload.
#[async_trait]
pub trait IpcHandler: Send + Sync + 'static {
    async fn call(&self, context: &Value, payload: Value) -> Result<Value, KitError>;

    /// A JSON Schema the payload must satisfy before `call` runs.
    fn payload_schema(&self) -> Option<&Value> {
        None
    }

    /// Overrides the router's default rate limit for this handler's name.
    fn rate_limit(&self) -> Option<RateLimitConfig> {
        None
    }
}

#[cfg(test)]
#[path = "handler_tests.rs"]
mod tests;
