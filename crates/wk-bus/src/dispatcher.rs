// SPDX-License-Identifier: MIT

//! Routes inbound `BusMessage`s from a renderer window to the matching
//! `MessageBus` operation.

use parking_lot::RwLock;
use std::collections::HashSet;
use std::sync::Arc;
use wk_core::{Clock, WindowId};
use wk_wire::BusMessage;

use crate::bus::MessageBus;
use crate::data_store::KeyPermission;

pub type GroupResolver = Arc<dyn Fn(&str) -> Vec<WindowId> + Send + Sync>;

pub struct BusDispatcher<C: Clock = wk_core::SystemClock> {
    bus: Arc<MessageBus<C>>,
    group_resolver: RwLock<Option<GroupResolver>>,
}

impl<C: Clock> BusDispatcher<C> {
    pub fn new(bus: Arc<MessageBus<C>>) -> Self {
        Self { bus, group_resolver: RwLock::new(None) }
    }

    pub fn set_group_resolver(&self, resolver: GroupResolver) {
        *self.group_resolver.write() = Some(resolver);
    }

    pub async fn dispatch(&self, window_id: WindowId, message: BusMessage) {
        match message {
            BusMessage::Get { key, request_id } => {
                let value = self.bus.get(&key);
                let response = BusMessage::GetResponse { request_id, value };
                if let Ok(bytes) = serde_json::to_vec(&response) {
                    if let Err(err) = self.bus.send_to_window(&window_id, bytes).await {
                        tracing::warn!(%window_id, key, error = %err, "failed to deliver GET_RESPONSE");
                    }
                }
            }
            BusMessage::Set { key, value } => {
                if let Err(err) = self.bus.set_data(&key, value, Some(window_id.clone()), false).await {
                    tracing::warn!(%window_id, key, error = %err, "SET denied");
                }
            }
            BusMessage::Delete { key } => {
                if let Err(err) = self.bus.delete_data(&key, Some(window_id.clone()), false).await {
                    tracing::warn!(%window_id, key, error = %err, "DELETE denied");
                }
            }
            BusMessage::Subscribe { key } => self.bus.subscribe(window_id, &key),
            BusMessage::Unsubscribe { key } => self.bus.unsubscribe(&window_id, &key),
            BusMessage::SetPermission { key, window_id: scoped_window, modify } => {
                let permission = if modify {
                    KeyPermission { readonly: false, allowed_windows: Some(HashSet::from([scoped_window])) }
                } else {
                    KeyPermission { readonly: true, allowed_windows: None }
                };
                self.bus.set_permission(key, permission);
            }
            BusMessage::TransactionStart => self.bus.start_transaction(window_id),
            BusMessage::Commit => {
                if let Err(err) = self.bus.commit_transaction(&window_id).await {
                    tracing::warn!(%window_id, error = %err, "transaction commit denied");
                }
            }
            BusMessage::Rollback => self.bus.rollback_transaction(&window_id),
            BusMessage::SendToWindow { window_id: target, payload } => {
                if let Ok(bytes) = serde_json::to_vec(&payload) {
                    if let Err(err) = self.bus.send_to_window(&target, bytes).await {
                        tracing::warn!(%target, error = %err, "SEND_TO_WINDOW failed");
                    }
                }
            }
            BusMessage::SendToGroup { group, payload } => {
                let resolver = self.group_resolver.read().clone();
                let Some(resolver) = resolver else {
                    tracing::warn!(group, "SEND_TO_GROUP received with no group resolver configured");
                    return;
                };
                let ids = resolver(&group);
                if let Ok(bytes) = serde_json::to_vec(&payload) {
                    self.bus.send_to_group(&ids, bytes).await;
                }
            }
            BusMessage::GetResponse { .. } | BusMessage::Update { .. } => {
                tracing::debug!(kind = message.kind(), "ignoring server-originated message type from a renderer");
            }
        }
    }
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;
