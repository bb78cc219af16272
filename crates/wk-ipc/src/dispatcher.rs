// SPDX-License-Identifier: MIT

//! Wires a host `RawChannel` to an `IpcRouter`: decodes inbound frames,
//! dispatches them, and writes the envelope back to the same sender.

use std::sync::Arc;
use wk_core::{Clock, RawChannel, SenderId};
use wk_wire::{IpcRequest, IpcResponse};

use crate::router::IpcRouter;

pub struct MessageDispatcher<C: Clock = wk_core::SystemClock> {
    router: Arc<IpcRouter<C>>,
    channel: Arc<dyn RawChannel>,
}

impl<C: Clock> MessageDispatcher<C> {
    pub fn new(router: Arc<IpcRouter<C>>, channel: Arc<dyn RawChannel>) -> Self {
        Self { router, channel }
    }

    /// Registers this dispatcher's handler on the channel. Subsequent
    /// inbound frames are decoded, dispatched, and answered in place.
    pub fn attach(self: &Arc<Self>) {
        let dispatcher = self.clone();
        self.channel.on_message(Arc::new(move |sender_id, data| {
            let dispatcher = dispatcher.clone();
            tokio::spawn(async move {
                dispatcher.handle_frame(sender_id, data).await;
            });
        }));
    }

    async fn handle_frame(&self, sender_id: SenderId, data: Vec<u8>) {
        let response = match serde_json::from_slice::<IpcRequest>(&data) {
            Ok(request) => self.router.handle(request, Some(sender_id)).await,
            Err(err) => IpcResponse::from_error(&wk_core::KitError::validation(format!("malformed request: {err}")), None),
        };

        let Ok(bytes) = serde_json::to_vec(&response) else {
            tracing::error!("failed to serialize ipc response");
            return;
        };

        if let Err(err) = self.channel.send(sender_id, bytes).await {
            tracing::warn!(%sender_id, error = %err, "failed to send ipc response");
        }
    }
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;
