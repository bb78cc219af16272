// SPDX-License-Identifier: MIT

//! Ordered invocation of plugin and hook chains around window creation and
//! destruction.

use parking_lot::RwLock;
use std::sync::Arc;
use wk_core::{WindowConfig, WindowId};

use crate::plugin::{HookOutcome, Plugin};

/// Runs `plugins` in registration order, then `hooks` in registration order.
/// Plugins are the host application's own extensions; hooks are the kit's
/// own built-in behaviors (dev tools, crash recovery) wired in ahead of time.
#[derive(Default)]
pub struct PluginExecutor {
    plugins: RwLock<Vec<Arc<dyn Plugin>>>,
    hooks: RwLock<Vec<Arc<dyn Plugin>>>,
}

impl PluginExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_plugin(&self, plugin: Arc<dyn Plugin>) {
        self.plugins.write().push(plugin);
    }

    pub fn register_hook(&self, hook: Arc<dyn Plugin>) {
        self.hooks.write().push(hook);
    }

    fn chain(&self) -> Vec<Arc<dyn Plugin>> {
        let mut chain = self.plugins.read().clone();
        chain.extend(self.hooks.read().iter().cloned());
        chain
    }

    pub async fn init_all(&self) {
        for plugin in self.chain() {
            plugin.on_init().await;
        }
    }

    /// Runs the creation gate. Returns `None` if a plugin cancelled, or the
    /// (possibly replaced) config to proceed with.
    pub async fn will_create(&self, mut config: WindowConfig) -> Option<WindowConfig> {
        for plugin in self.chain() {
            match plugin.on_will_create(&config).await {
                HookOutcome::Continue => {}
                HookOutcome::Cancelled => {
                    tracing::info!(plugin = plugin.name(), "window creation cancelled by plugin");
                    return None;
                }
                HookOutcome::Replace(replacement) => config = replacement,
            }
        }
        Some(config)
    }

    pub async fn did_create(&self, id: &WindowId) {
        for plugin in self.chain() {
            if let Err(err) = plugin.on_did_create(id).await {
                tracing::warn!(plugin = plugin.name(), %id, error = %err, "onDidCreate hook failed");
            }
        }
    }

    pub async fn will_destroy(&self, id: &WindowId) {
        for plugin in self.chain() {
            if let Err(err) = plugin.on_will_destroy(id).await {
                tracing::warn!(plugin = plugin.name(), %id, error = %err, "onWillDestroy hook failed");
            }
        }
    }

    pub async fn did_destroy(&self, id: &WindowId) {
        for plugin in self.chain() {
            if let Err(err) = plugin.on_did_destroy(id).await {
                tracing::warn!(plugin = plugin.name(), %id, error = %err, "onDidDestroy hook failed");
            }
        }
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
