// SPDX-License-Identifier: MIT

//! Composes the registry, operator, state manager, and context persistence
//! collaborator into the single facade the toolkit hands out to callers.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use wk_core::{Clock, KitError, WindowId};

use crate::context::{ContextPersistence, InMemoryContextPersistence};
use crate::operator::WindowOperator;
use crate::registry::WindowRegistry;
use crate::state_manager::WindowStateManager;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WindowStoreConfig {
    /// Caps the number of simultaneously registered windows. `None` means
    /// unbounded.
    #[serde(default)]
    pub max_windows: Option<usize>,
}

pub struct WindowStore<C: Clock = wk_core::SystemClock> {
    pub registry: WindowRegistry,
    pub operator: WindowOperator,
    pub state: WindowStateManager<C>,
    context: Arc<dyn ContextPersistence>,
    config: WindowStoreConfig,
    focus_stack: Mutex<Vec<WindowId>>,
}

impl<C: Clock> WindowStore<C> {
    pub fn new(
        registry: WindowRegistry,
        state: WindowStateManager<C>,
        context: Arc<dyn ContextPersistence>,
        config: WindowStoreConfig,
    ) -> Self {
        let operator = WindowOperator::new(registry.clone());
        Self { registry, operator, state, context, config, focus_stack: Mutex::new(Vec::new()) }
    }

    /// Builds a store backed by the in-memory context store, for hosts that
    /// don't need cross-session context persistence.
    pub fn with_in_memory_context(registry: WindowRegistry, state: WindowStateManager<C>, config: WindowStoreConfig) -> Self {
        Self::new(registry, state, Arc::new(InMemoryContextPersistence::new()), config)
    }

    /// Registers a freshly created window, rejecting it if doing so would
    /// exceed the configured `max_windows`.
    pub fn add(&self, id: WindowId, name: impl Into<String>, window: Arc<dyn wk_core::HostWindow>) -> Result<(), KitError> {
        if let Some(max) = self.config.max_windows {
            if self.registry.count() >= max {
                return Err(KitError::window(format!("window limit of {max} reached")));
            }
        }
        self.registry.register(id, name, window);
        Ok(())
    }

    pub async fn remove(&self, id: &WindowId) -> Result<(), KitError> {
        self.state.unmanage(id);
        self.unfocus(id);
        self.registry.unregister(id);
        self.context.clear(id).await
    }

    /// Records `id` as the topmost focused window, deduplicating: if it is
    /// already on the stack it is moved to the top rather than duplicated.
    pub fn focus(&self, id: &WindowId) {
        let mut stack = self.focus_stack.lock();
        stack.retain(|existing| existing != id);
        stack.push(id.clone());
    }

    fn unfocus(&self, id: &WindowId) {
        self.focus_stack.lock().retain(|existing| existing != id);
    }

    pub fn focused_window(&self) -> Option<WindowId> {
        self.focus_stack.lock().last().cloned()
    }

    /// The window focused immediately before the current one, or `None` if
    /// fewer than two windows have ever been focused.
    pub fn previous_focused_window(&self) -> Option<WindowId> {
        let stack = self.focus_stack.lock();
        let len = stack.len();
        if len < 2 {
            return None;
        }
        stack.get(len - 2).cloned()
    }

    pub fn list_by_group(&self, group: &str) -> Vec<WindowId> {
        self.registry.group_ids(group)
    }

    pub fn count_by_group(&self, group: &str) -> usize {
        self.registry.group_ids(group).len()
    }

    pub fn show_group(&self, group: &str) {
        for id in self.registry.group_ids(group) {
            self.operator.show(&id);
        }
    }

    pub fn hide_group(&self, group: &str) {
        for id in self.registry.group_ids(group) {
            self.operator.hide(&id);
        }
    }

    pub fn focus_group(&self, group: &str) {
        for id in self.registry.group_ids(group) {
            self.operator.focus(&id);
            self.focus(&id);
        }
    }

    /// Closes every window in `group`, yielding between each one so the UI
    /// gets a tick to process each close before the next is scheduled.
    pub async fn close_group(&self, group: &str) {
        let ids = self.registry.group_ids(group);
        for id in ids {
            self.operator.close(&id);
            tokio::task::yield_now().await;
        }
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
