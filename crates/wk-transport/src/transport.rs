// SPDX-License-Identifier: MIT

//! The duplex carrier between the main process and a specific window,
//! behind one interface implemented by two strategies.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use wk_core::{HostWindow, KitError, PortFactory, PortPair, WindowId};

const PORT_INJECTION_CHANNEL: &str = "wk-transport:port";

/// Callback invoked for every inbound message, regardless of strategy.
pub type OnMessage = Arc<dyn Fn(WindowId, Vec<u8>) + Send + Sync>;

#[async_trait]
pub trait Transport: Send + Sync {
    fn init(&self, on_message: OnMessage);
    fn register_window(&self, id: WindowId, window: Arc<dyn HostWindow>);
    fn unregister_window(&self, id: WindowId);
    async fn send(&self, id: WindowId, msg: Vec<u8>) -> Result<(), KitError>;

    /// Sends to `ids`, or every registered window if `None`. Individual
    /// failures are logged, not propagated; returns the success count.
    async fn broadcast(&self, msg: Vec<u8>, ids: Option<&[WindowId]>) -> usize;

    fn dispose(&self);
}

struct PortEntry {
    window: Arc<dyn HostWindow>,
    main_side: Arc<dyn PortPair>,
}

/// Creates a linked port pair per window and injects the renderer side into
/// it; the main side is kept here and used for all subsequent sends.
pub struct PortTransport {
    factory: Arc<dyn PortFactory>,
    entries: RwLock<HashMap<WindowId, PortEntry>>,
}

impl PortTransport {
    pub fn new(factory: Arc<dyn PortFactory>) -> Self {
        Self { factory, entries: RwLock::new(HashMap::new()) }
    }
}

#[async_trait]
impl Transport for PortTransport {
    fn init(&self, _on_message: OnMessage) {
        // Port strategy delivers inbound frames directly through the
        // injected port on the renderer side; the main side has nothing
        // further to wire up here.
    }

    fn register_window(&self, id: WindowId, window: Arc<dyn HostWindow>) {
        let (main_side, renderer_side) = self.factory.create_pair();
        window.inject_port(PORT_INJECTION_CHANNEL, renderer_side);
        self.entries.write().insert(id, PortEntry { window, main_side });
    }

    fn unregister_window(&self, id: WindowId) {
        if let Some(entry) = self.entries.write().remove(&id) {
            entry.main_side.close();
        }
    }

    async fn send(&self, id: WindowId, msg: Vec<u8>) -> Result<(), KitError> {
        let main_side = self.entries.read().get(&id).map(|e| e.main_side.clone());
        match main_side {
            Some(port) if !port.is_closed() => port.post(msg),
            Some(_) => Ok(()),
            None => Err(KitError::transport(format!("no port registered for window {id}"))),
        }
    }

    async fn broadcast(&self, msg: Vec<u8>, ids: Option<&[WindowId]>) -> usize {
        let targets: Vec<WindowId> = match ids {
            Some(ids) => ids.to_vec(),
            None => self.entries.read().keys().cloned().collect(),
        };
        let mut sent = 0;
        for id in targets {
            match self.send(id.clone(), msg.clone()).await {
                Ok(()) => sent += 1,
                Err(err) => tracing::warn!(%id, error = %err, "port broadcast send failed"),
            }
        }
        sent
    }

    fn dispose(&self) {
        let mut entries = self.entries.write();
        for (_, entry) in entries.drain() {
            entry.main_side.close();
        }
    }
}

/// A single named channel; sender identity is resolved by looking up
/// registered windows, not by a dedicated per-window port.
pub struct ChannelTransport {
    windows: RwLock<HashMap<WindowId, Arc<dyn HostWindow>>>,
    on_message: RwLock<Option<OnMessage>>,
}

impl ChannelTransport {
    pub fn new() -> Self {
        Self { windows: RwLock::new(HashMap::new()), on_message: RwLock::new(None) }
    }

    /// Hands an inbound frame already resolved to its sending window to the
    /// callback registered via `init`. Resolving the renderer's identity to
    /// a `WindowId` is host-specific glue outside this crate; this is the
    /// seam real embeddings call into once they've done so.
    pub fn deliver(&self, window_id: WindowId, data: Vec<u8>) {
        if let Some(callback) = self.on_message.read().as_ref() {
            callback(window_id, data);
        } else {
            tracing::warn!(%window_id, "dropping inbound channel frame: transport not initialized");
        }
    }
}

impl Default for ChannelTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for ChannelTransport {
    fn init(&self, on_message: OnMessage) {
        *self.on_message.write() = Some(on_message);
    }

    fn register_window(&self, id: WindowId, window: Arc<dyn HostWindow>) {
        self.windows.write().insert(id, window);
    }

    fn unregister_window(&self, id: WindowId) {
        self.windows.write().remove(&id);
    }

    async fn send(&self, id: WindowId, msg: Vec<u8>) -> Result<(), KitError> {
        let window = self.windows.read().get(&id).cloned();
        match window {
            Some(window) => window.send(CHANNEL_NAME, msg).await,
            None => Err(KitError::transport(format!("no window registered for {id}"))),
        }
    }

    async fn broadcast(&self, msg: Vec<u8>, ids: Option<&[WindowId]>) -> usize {
        let targets: Vec<WindowId> = match ids {
            Some(ids) => ids.to_vec(),
            None => self.windows.read().keys().cloned().collect(),
        };
        let mut sent = 0;
        for id in targets {
            match self.send(id.clone(), msg.clone()).await {
                Ok(()) => sent += 1,
                Err(err) => tracing::warn!(%id, error = %err, "channel broadcast send failed"),
            }
        }
        sent
    }

    fn dispose(&self) {
        self.windows.write().clear();
        *self.on_message.write() = None;
    }
}

const CHANNEL_NAME: &str = "wk-bus:channel";

/// Picks the Port strategy when a `PortFactory` is available, else falls
/// back to the Channel strategy. A `Transport::init` failure on the chosen
/// strategy is not modeled here since the fakes cannot fail to init; real
/// embeddings perform the equivalent fallback at construction time.
pub fn select_transport(port_factory: Option<Arc<dyn PortFactory>>) -> Arc<dyn Transport> {
    match port_factory {
        Some(factory) => Arc::new(PortTransport::new(factory)),
        None => Arc::new(ChannelTransport::new()),
    }
}

#[cfg(test)]
#[path = "transport_tests.rs"]
mod tests;
