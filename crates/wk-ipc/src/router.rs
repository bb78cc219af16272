// SPDX-License-Identifier: MIT

//! Dispatches validated, rate-limited requests to registered handlers and
//! wraps every outcome in the wire envelope.

use jsonschema::Validator;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::Instrument;
use wk_core::{Clock, KitError, SenderId};
use wk_wire::{IpcRequest, IpcResponse};

use crate::handler::IpcHandler;
use crate::rate_limit::{RateLimitConfig, RateLimiter};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RouterConfig {
    /// When set, `from_error` attaches a formatted stack trace to failed responses.
    #[serde(default)]
    pub debug: bool,
    #[serde(default)]
    pub default_rate_limit: RateLimitConfig,
}

struct RegisteredHandler {
    handler: Arc<dyn IpcHandler>,
    schema: Option<Validator>,
}

pub struct IpcRouter<C: Clock = wk_core::SystemClock> {
    handlers: RwLock<HashMap<String, RegisteredHandler>>,
    api: RwLock<serde_json::Value>,
    rate_limiter: RateLimiter<C>,
    debug: bool,
}

impl<C: Clock> IpcRouter<C> {
    pub fn new(clock: C, config: RouterConfig) -> Self {
        Self {
            handlers: RwLock::new(HashMap::new()),
            api: RwLock::new(serde_json::Value::Object(Default::default())),
            rate_limiter: RateLimiter::new(clock, config.default_rate_limit),
            debug: config.debug,
        }
    }

    pub fn rate_limiter(&self) -> &RateLimiter<C> {
        &self.rate_limiter
    }

    /// Replaces the shared context record every handler call sees.
    pub fn set_context(&self, context: serde_json::Value) {
        *self.api.write() = context;
    }

    pub fn register(&self, name: impl Into<String>, handler: Arc<dyn IpcHandler>) -> Result<(), KitError> {
        let name = name.into();
        let schema = match handler.payload_schema() {
            Some(schema) => {
                Some(jsonschema::validator_for(schema).map_err(|err| KitError::internal(format!("invalid payload schema for {name}: {err}")))?)
            }
            None => None,
        };
        if let Some(rate_limit) = handler.rate_limit() {
            self.rate_limiter.set_rule(name.clone(), rate_limit);
        }
        self.handlers.write().insert(name, RegisteredHandler { handler, schema });
        Ok(())
    }

    pub fn register_many(&self, handlers: impl IntoIterator<Item = (String, Arc<dyn IpcHandler>)>) -> Result<(), KitError> {
        for (name, handler) in handlers {
            self.register(name, handler)?;
        }
        Ok(())
    }

    pub fn unregister(&self, name: &str) {
        self.handlers.write().remove(name);
        self.rate_limiter.remove_rule(name);
    }

    pub async fn handle(&self, request: IpcRequest, sender_id: Option<SenderId>) -> IpcResponse {
        let span = tracing::info_span!("IPC Call", handler = %request.name);
        async move {
            if let Err(err) = request.validate() {
                return self.envelope(err);
            }

            if let Some(sender_id) = sender_id {
                let key = format!("{sender_id}:{}", request.name);
                if !self.rate_limiter.check(&key, &request.name) {
                    return self.envelope(KitError::rate_limit(format!("rate limit exceeded for {}", request.name)));
                }
            }

            let (context, handler) = {
                let handlers = self.handlers.read();
                let Some(entry) = handlers.get(&request.name) else {
                    return self.envelope(KitError::not_found(format!("no handler registered for {}", request.name)));
                };

                if let Some(schema) = &entry.schema {
                    let issues: Vec<serde_json::Value> = schema
                        .iter_errors(&request.payload)
                        .map(|err| json!({ "path": err.instance_path().to_string(), "message": err.to_string() }))
                        .collect();
                    if !issues.is_empty() {
                        let message = format!("payload validation failed for {}", request.name);
                        return self.envelope(KitError::validation(message).with_details(json!({ "issues": issues })));
                    }
                }

                let context = self.api.read().clone();
                let handler = entry.handler.clone();
                (context, handler)
            };

            match handler.call(&context, request.payload).await {
                Ok(data) => IpcResponse::ok(data),
                Err(err) => self.envelope(err),
            }
        }
        .instrument(span)
        .await
    }

    fn envelope(&self, err: KitError) -> IpcResponse {
        tracing::warn!(category = %err.category, message = %err.message, "ipc call failed");
        let stack = self.debug.then(|| format!("{:?}", err));
        IpcResponse::from_error(&err, stack)
    }

    /// Registered handler names, for a host-side debug panel.
    pub fn handler_names(&self) -> Vec<String> {
        self.handlers.read().keys().cloned().collect()
    }

    pub fn dispose(&self) {
        self.rate_limiter.stop_sweeper();
        self.handlers.write().clear();
    }
}

#[cfg(test)]
#[path = "router_tests.rs"]
mod tests;
