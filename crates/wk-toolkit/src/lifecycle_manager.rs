// SPDX-License-Identifier: MIT

//! Orderly startup and shutdown of the kit's subsystems: router, bus, then
//! the window manager; reversed on the way down. A failed startup step
//! triggers a best-effort shutdown of whatever already started.

use std::sync::Arc;
use wk_bus::{BusDispatcher, MessageBus};
use wk_core::{Clock, KitError};
use wk_ipc::IpcRouter;
use wk_lifecycle::PluginExecutor;
use wk_registry::WindowStore;
use wk_transport::Transport;

use crate::bus_binding::BusBindingPlugin;
use crate::config::ToolkitConfig;

pub struct LifecycleManager<C: Clock = wk_core::SystemClock> {
    config: ToolkitConfig,
    router: Arc<IpcRouter<C>>,
    bus: Arc<MessageBus<C>>,
    transport: Arc<dyn Transport>,
    store: Arc<WindowStore<C>>,
    plugins: Arc<PluginExecutor>,
}

impl<C: Clock> LifecycleManager<C> {
    pub fn new(
        config: ToolkitConfig,
        router: Arc<IpcRouter<C>>,
        bus: Arc<MessageBus<C>>,
        transport: Arc<dyn Transport>,
        store: Arc<WindowStore<C>>,
        plugins: Arc<PluginExecutor>,
    ) -> Self {
        Self { config, router, bus, transport, store, plugins }
    }

    /// Validates the config, then router, then bus, then the window manager;
    /// wires bus auto-registration into the lifecycle hooks; exposes debug
    /// handles in development. Any step failing triggers shutdown of what
    /// already started and re-throws.
    pub async fn startup(&self, bus_dispatcher: Arc<BusDispatcher<C>>) -> Result<(), KitError> {
        if let Err(err) = self.start_inner(bus_dispatcher).await {
            tracing::error!(error = %err, "toolkit startup failed, shutting down what already started");
            self.shutdown();
            return Err(err);
        }
        Ok(())
    }

    async fn start_inner(&self, bus_dispatcher: Arc<BusDispatcher<C>>) -> Result<(), KitError> {
        self.config.validate()?;
        tracing::info!("router ready");

        self.wire_bus_transport(bus_dispatcher);
        tracing::info!("bus ready");

        self.plugins.init_all().await;
        tracing::info!("window manager ready");

        self.plugins.register_hook(Arc::new(BusBindingPlugin::new(self.store.clone(), self.bus.clone())));

        if self.config.development {
            tracing::info!(
                handlers = ?self.router.handler_names(),
                keys = ?self.bus.key_snapshot(),
                "development mode: debug handles exposed"
            );
        }

        Ok(())
    }

    fn wire_bus_transport(&self, bus_dispatcher: Arc<BusDispatcher<C>>) {
        let bus_dispatcher = bus_dispatcher.clone();
        self.transport.init(Arc::new(move |window_id, bytes| {
            let bus_dispatcher = bus_dispatcher.clone();
            match serde_json::from_slice(&bytes) {
                Ok(message) => {
                    tokio::spawn(async move { bus_dispatcher.dispatch(window_id, message).await });
                }
                Err(err) => {
                    tracing::warn!(%window_id, error = %err, "dropping malformed bus frame");
                }
            }
        }));
    }

    pub fn shutdown(&self) {
        self.bus.dispose();
        self.store.registry.stop_cleanup();
        self.router.dispose();
        tracing::info!("toolkit shut down");
    }
}

#[cfg(test)]
#[path = "lifecycle_manager_tests.rs"]
mod tests;
