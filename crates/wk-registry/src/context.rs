// SPDX-License-Identifier: MIT

//! Opaque per-window context persistence, injected into `WindowStore`.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use wk_core::{KitError, WindowId};

#[async_trait]
pub trait ContextPersistence: Send + Sync + 'static {
    async fn save(&self, id: &WindowId, ctx: serde_json::Value) -> Result<(), KitError>;
    async fn load(&self, id: &WindowId) -> Result<Option<serde_json::Value>, KitError>;
    async fn clear(&self, id: &WindowId) -> Result<(), KitError>;
}

/// In-memory context store; the default when a host does not supply one.
#[derive(Default)]
pub struct InMemoryContextPersistence {
    entries: Mutex<HashMap<WindowId, serde_json::Value>>,
}

impl InMemoryContextPersistence {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ContextPersistence for InMemoryContextPersistence {
    async fn save(&self, id: &WindowId, ctx: serde_json::Value) -> Result<(), KitError> {
        self.entries.lock().insert(id.clone(), ctx);
        Ok(())
    }

    async fn load(&self, id: &WindowId) -> Result<Option<serde_json::Value>, KitError> {
        Ok(self.entries.lock().get(id).cloned())
    }

    async fn clear(&self, id: &WindowId) -> Result<(), KitError> {
        self.entries.lock().remove(id);
        Ok(())
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
