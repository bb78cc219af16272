// SPDX-License-Identifier: MIT

//! Composes the data store, subscriptions, and transactions over a
//! transport: the renderer-facing half of shared application state.

use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use wk_core::{Clock, HostWindow, KitError, WindowEvent, WindowId};
use wk_transport::Transport;
use wk_wire::BusMessage;

use crate::config::BusConfig;
use crate::data_store::{DataStoreManager, KeyPermission, StoreOp};
use crate::subscription::SubscriptionManager;
use crate::transaction::{BufferedOp, TransactionManager};

type Watcher = Arc<dyn Fn(&Value, &Value) + Send + Sync>;

struct WatchEntry {
    key: String,
    window_id: Option<WindowId>,
    callback: Watcher,
}

pub struct MessageBus<C: Clock = wk_core::SystemClock> {
    store: DataStoreManager,
    pub(crate) subscriptions: SubscriptionManager,
    transactions: TransactionManager,
    transport: Arc<dyn Transport>,
    registered: RwLock<HashMap<WindowId, Arc<dyn HostWindow>>>,
    watchers: Mutex<Vec<(u64, WatchEntry)>>,
    next_watcher_id: Mutex<u64>,
    clock: C,
}

impl<C: Clock> MessageBus<C> {
    pub fn new(transport: Arc<dyn Transport>, clock: C) -> Self {
        Self::with_config(transport, clock, BusConfig::default())
    }

    pub fn with_config(transport: Arc<dyn Transport>, clock: C, config: BusConfig) -> Self {
        Self {
            store: DataStoreManager::new(),
            subscriptions: SubscriptionManager::with_warn_threshold(config.subscriber_warn_threshold),
            transactions: TransactionManager::new(),
            transport,
            registered: RwLock::new(HashMap::new()),
            watchers: Mutex::new(Vec::new()),
            next_watcher_id: Mutex::new(0),
            clock,
        }
    }

    pub fn set_permission(&self, key: impl Into<String>, permission: KeyPermission) {
        self.store.set_permission(key, permission);
    }

    pub fn register_window(&self, id: WindowId, window: Arc<dyn HostWindow>) {
        self.transport.register_window(id.clone(), window.clone());
        self.registered.write().insert(id, window);
    }

    pub fn unregister_window(&self, id: &WindowId) {
        self.transport.unregister_window(id.clone());
        self.registered.write().remove(id);
        self.transactions.rollback(id);
        self.subscriptions.remove_window(id);
        self.watchers.lock().retain(|(_, entry)| entry.window_id.as_ref() != Some(id));
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.store.get(key)
    }

    pub fn get_all(&self) -> HashMap<String, Value> {
        self.store.get_all()
    }

    /// Stored keys, for a host-side debug panel; deliberately omits values.
    pub fn key_snapshot(&self) -> Vec<String> {
        self.store.get_all().into_keys().collect()
    }

    pub async fn set_data(&self, key: &str, value: Value, window_id: Option<WindowId>, skip_transaction: bool) -> Result<(), KitError> {
        self.store.check_permission(key, window_id.as_ref(), StoreOp::Modify)?;

        if !skip_transaction {
            if let Some(window_id) = &window_id {
                if self.transactions.has_active(window_id) {
                    self.transactions.add(window_id, key, BufferedOp::Set(value));
                    return Ok(());
                }
            }
        }

        let old_value = self.store.set(key, value.clone());
        self.notify(key, Some(value), old_value, window_id).await;
        Ok(())
    }

    pub async fn delete_data(&self, key: &str, window_id: Option<WindowId>, skip_transaction: bool) -> Result<(), KitError> {
        self.store.check_permission(key, window_id.as_ref(), StoreOp::Delete)?;

        if !skip_transaction {
            if let Some(window_id) = &window_id {
                if self.transactions.has_active(window_id) {
                    self.transactions.add(window_id, key, BufferedOp::Delete);
                    return Ok(());
                }
            }
        }

        let old_value = self.store.delete(key);
        self.notify(key, None, old_value, window_id).await;
        Ok(())
    }

    /// Reads the current value (consulting the caller's own pending writes
    /// first, so a read-after-write within an open transaction sees it),
    /// applies `updater`, and writes the result back.
    pub async fn update_data(&self, key: &str, window_id: Option<WindowId>, updater: impl FnOnce(Option<Value>) -> Value) -> Result<(), KitError> {
        let current = match &window_id {
            Some(id) => match self.transactions.buffered_value(id, key) {
                Some(buffered) => buffered,
                None => self.store.get(key),
            },
            None => self.store.get(key),
        };
        let updated = updater(current);
        self.set_data(key, updated, window_id, false).await
    }

    pub fn start_transaction(&self, window_id: WindowId) {
        self.transactions.start(window_id);
    }

    pub async fn commit_transaction(&self, window_id: &WindowId) -> Result<(), KitError> {
        let Some(frame) = self.transactions.commit(window_id) else { return Ok(()) };
        for (key, op) in frame {
            match op {
                BufferedOp::Set(value) => self.set_data(&key, value, Some(window_id.clone()), true).await?,
                BufferedOp::Delete => self.delete_data(&key, Some(window_id.clone()), true).await?,
            }
        }
        Ok(())
    }

    pub fn rollback_transaction(&self, window_id: &WindowId) {
        self.transactions.rollback(window_id);
    }

    pub fn subscribe(&self, window_id: WindowId, key: &str) {
        self.subscriptions.subscribe(window_id, key);
    }

    pub fn unsubscribe(&self, window_id: &WindowId, key: &str) {
        self.subscriptions.unsubscribe(window_id, key);
    }

    async fn notify(&self, key: &str, value: Option<Value>, old_value: Option<Value>, window_id: Option<WindowId>) {
        for (_, entry) in self.watchers.lock().iter() {
            if entry.key != key {
                continue;
            }
            (entry.callback)(&value.clone().unwrap_or(Value::Null), &old_value.clone().unwrap_or(Value::Null));
        }

        let event = BusMessage::Update {
            key: Some(key.to_string()),
            value,
            old_value,
            window_id: window_id.clone(),
            timestamp: self.clock.epoch_ms() as i64,
        };
        self.broadcast(&event, key).await;
    }

    async fn broadcast(&self, message: &BusMessage, key: &str) {
        let Ok(bytes) = serde_json::to_vec(message) else {
            tracing::error!(key, "failed to serialize bus broadcast");
            return;
        };
        if self.subscriptions.has_subscribers(key) {
            let targets = self.subscriptions.subscribers(key);
            self.transport.broadcast(bytes, Some(&targets)).await;
        } else {
            self.transport.broadcast(bytes, None).await;
        }
    }

    /// Subscribes an in-process callback to every change of `key`. If
    /// `window_id` is set, the subscription is torn down alongside that
    /// window. Returns an id that can be passed to `unwatch`.
    pub fn watch(&self, key: impl Into<String>, window_id: Option<WindowId>, callback: Watcher) -> u64 {
        let mut next_id = self.next_watcher_id.lock();
        let id = *next_id;
        *next_id += 1;
        self.watchers.lock().push((id, WatchEntry { key: key.into(), window_id, callback }));
        id
    }

    pub fn unwatch(&self, id: u64) {
        self.watchers.lock().retain(|(existing, _)| *existing != id);
    }

    /// Forwards a window lifecycle event to every connected renderer on the
    /// same wire the store's own UPDATE broadcasts use, tagged by its own
    /// `type` discriminant so renderers dispatch on it the same way.
    pub async fn broadcast_event(&self, event: &WindowEvent) {
        let Ok(bytes) = serde_json::to_vec(event) else {
            tracing::error!("failed to serialize lifecycle event for broadcast");
            return;
        };
        self.transport.broadcast(bytes, None).await;
    }

    pub async fn send_to_window(&self, id: &WindowId, payload: Vec<u8>) -> Result<(), KitError> {
        self.transport.send(id.clone(), payload).await
    }

    pub async fn send_to_group(&self, ids: &[WindowId], payload: Vec<u8>) -> usize {
        self.transport.broadcast(payload, Some(ids)).await
    }

    pub fn dispose(&self) {
        for (_, entry) in self.watchers.lock().drain(..) {
            drop(entry);
        }
        self.transport.dispose();
    }
}

#[cfg(test)]
#[path = "bus_tests.rs"]
mod tests;
