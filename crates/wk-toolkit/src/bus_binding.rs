// SPDX-License-Identifier: MIT

//! The kit's own built-in wiring between the window lifecycle and the bus,
//! so host plugins never have to remember to register windows or forward
//! lifecycle events themselves.

use async_trait::async_trait;
use std::sync::Arc;
use wk_bus::MessageBus;
use wk_core::{Clock, EventSink, KitError, WindowEvent, WindowId};
use wk_lifecycle::Plugin;
use wk_registry::WindowStore;

pub struct BusBindingPlugin<C: Clock> {
    store: Arc<WindowStore<C>>,
    bus: Arc<MessageBus<C>>,
}

impl<C: Clock> BusBindingPlugin<C> {
    pub fn new(store: Arc<WindowStore<C>>, bus: Arc<MessageBus<C>>) -> Self {
        Self { store, bus }
    }
}

#[async_trait]
impl<C: Clock> Plugin for BusBindingPlugin<C> {
    fn name(&self) -> &str {
        "wk-bus-binding"
    }

    async fn on_did_create(&self, id: &WindowId) -> Result<(), KitError> {
        if let Some(window) = self.store.registry.get_by_id(id) {
            self.bus.register_window(id.clone(), window);
        }
        Ok(())
    }

    async fn on_will_destroy(&self, id: &WindowId) -> Result<(), KitError> {
        self.bus.unregister_window(id);
        Ok(())
    }
}

/// Forwards `WindowLifecycle`'s emitted events onto the bus's transport so
/// renderers observe them the same way they observe store updates, without
/// `WindowLifecycle` holding a reference to `MessageBus`.
pub struct BusEventSink<C: Clock> {
    bus: Arc<MessageBus<C>>,
}

impl<C: Clock> BusEventSink<C> {
    pub fn new(bus: Arc<MessageBus<C>>) -> Self {
        Self { bus }
    }
}

#[async_trait]
impl<C: Clock> EventSink for BusEventSink<C> {
    async fn emit(&self, event: WindowEvent) {
        self.bus.broadcast_event(&event).await;
    }
}

#[cfg(test)]
#[path = "bus_binding_tests.rs"]
mod tests;
