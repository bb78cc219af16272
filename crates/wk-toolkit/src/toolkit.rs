// SPDX-License-Identifier: MIT

//! The kit's single entry point: wires a router, bus, and window lifecycle
//! together and hands them to a `LifecycleManager` for ordered startup. Holds
//! no logic of its own beyond construction and exposing shared handles.

use std::sync::Arc;
use wk_bus::{BusDispatcher, MessageBus};
use wk_core::host::PortFactory;
use wk_core::{Clock, DisplayProvider, KitError, RawChannel, WindowFactory};
use wk_ipc::{IpcRouter, MessageDispatcher};
use wk_lifecycle::{PluginExecutor, WindowLifecycle};
use wk_registry::{InMemoryContextPersistence, WindowRegistry, WindowStateManager, WindowStore};
use wk_storage::StateKeeper;
use wk_transport::select_transport;

use crate::bus_binding::BusEventSink;
use crate::config::ToolkitConfig;
use crate::lifecycle_manager::LifecycleManager;

/// Everything a host needs to construct a `Toolkit`: the desktop-runtime
/// collaborators this crate cannot implement itself.
pub struct ToolkitHost {
    pub window_factory: Arc<dyn WindowFactory>,
    pub displays: Arc<dyn DisplayProvider>,
    pub ipc_channel: Arc<dyn RawChannel>,
    pub port_factory: Option<Arc<dyn PortFactory>>,
}

pub struct Toolkit<C: Clock = wk_core::SystemClock> {
    router: Arc<IpcRouter<C>>,
    bus: Arc<MessageBus<C>>,
    store: Arc<WindowStore<C>>,
    lifecycle: Arc<WindowLifecycle<C>>,
    bus_dispatcher: Arc<BusDispatcher<C>>,
    ipc_dispatcher: Arc<MessageDispatcher<C>>,
    lifecycle_manager: LifecycleManager<C>,
}

impl<C: Clock> Toolkit<C> {
    /// Constructs every subsystem but performs no I/O; call `start` to bring
    /// the toolkit up.
    pub fn new(config: ToolkitConfig, clock: C, host: ToolkitHost) -> Self {
        let registry = WindowRegistry::new();
        let state_keeper = StateKeeper::open(config.state_keeper.clone(), clock.clone());
        let state = WindowStateManager::new(registry.clone(), state_keeper, host.displays);
        let store = Arc::new(WindowStore::new(
            registry,
            state,
            Arc::new(InMemoryContextPersistence::new()),
            config.window_store.clone(),
        ));

        let transport = select_transport(host.port_factory);
        let bus = Arc::new(MessageBus::with_config(transport.clone(), clock.clone(), config.bus.clone()));
        let bus_dispatcher = Arc::new(BusDispatcher::new(bus.clone()));

        let plugins = Arc::new(PluginExecutor::new());
        let lifecycle = Arc::new(
            WindowLifecycle::new(store.clone(), host.window_factory, plugins.clone(), clock.clone())
                .with_event_sink(Arc::new(BusEventSink::new(bus.clone()))),
        );

        let router = Arc::new(IpcRouter::new(clock, config.router.clone()));
        let ipc_dispatcher = Arc::new(MessageDispatcher::new(router.clone(), host.ipc_channel));

        let lifecycle_manager = LifecycleManager::new(config, router.clone(), bus.clone(), transport, store.clone(), plugins);

        Self { router, bus, store, lifecycle, bus_dispatcher, ipc_dispatcher, lifecycle_manager }
    }

    /// Validates configuration, wires the bus transport, attaches the IPC
    /// dispatcher, and runs every registered plugin's `init`. Rolls back and
    /// re-throws if any step fails.
    pub async fn start(&self) -> Result<(), KitError> {
        self.lifecycle_manager.startup(self.bus_dispatcher.clone()).await?;
        self.ipc_dispatcher.attach();
        Ok(())
    }

    pub fn shutdown(&self) {
        self.lifecycle_manager.shutdown();
    }

    pub fn router(&self) -> &Arc<IpcRouter<C>> {
        &self.router
    }

    pub fn bus(&self) -> &Arc<MessageBus<C>> {
        &self.bus
    }

    pub fn lifecycle(&self) -> &Arc<WindowLifecycle<C>> {
        &self.lifecycle
    }

    pub fn store(&self) -> &Arc<WindowStore<C>> {
        &self.store
    }
}

#[cfg(test)]
#[path = "toolkit_tests.rs"]
mod tests;
