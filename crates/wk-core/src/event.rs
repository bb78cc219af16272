// SPDX-License-Identifier: MIT

//! Window lifecycle events.
//!
//! Emitted by `WindowLifecycle`/`WindowStore` (in `wk-lifecycle`/`wk-registry`)
//! and consumed by the `MessageBus` (via `LifecycleManager`'s wiring) without
//! either side holding a reference to the other — see the "cyclic references"
//! design note.
//!
//! Serializes with `{"type": "event-name", ...fields}` format, the same
//! tagged-union convention `BusMessage` uses for the store's own wire
//! traffic.

use crate::id::WindowId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Reason a renderer process went away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrashReason {
    Crashed,
    Oom,
    Killed,
    LaunchFailed,
    IntegrityFailure,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WindowEvent {
    #[serde(rename = "window-created")]
    WindowCreated { id: WindowId, name: String },

    #[serde(rename = "window-will-be-destroyed")]
    WindowWillBeDestroyed { id: WindowId },

    #[serde(rename = "window-destroyed")]
    WindowDestroyed { id: WindowId },

    #[serde(rename = "window-crash")]
    WindowCrash { id: WindowId, reason: CrashReason, exit_code: Option<i32> },

    #[serde(rename = "window-unresponsive")]
    WindowUnresponsive { id: WindowId },

    #[serde(rename = "error")]
    Error { message: String },
}

/// Receives lifecycle events without the emitter holding a reference back
/// to whatever consumes them — see the "cyclic references" design note:
/// `WindowLifecycle` emits, `MessageBus` consumes, neither holds the other.
#[async_trait]
pub trait EventSink: Send + Sync + 'static {
    async fn emit(&self, event: WindowEvent);
}

/// The default sink for callers that don't need lifecycle events delivered
/// anywhere (most unit tests).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEventSink;

#[async_trait]
impl EventSink for NoopEventSink {
    async fn emit(&self, _event: WindowEvent) {}
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
