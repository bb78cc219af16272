// SPDX-License-Identifier: MIT

//! Per-window write buffering so a batch of sets/deletes commits (or rolls
//! back) atomically from the caller's perspective.

use indexmap::IndexMap;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use wk_core::WindowId;

#[derive(Debug, Clone, PartialEq)]
pub enum BufferedOp {
    Set(Value),
    Delete,
}

#[derive(Default)]
pub struct TransactionManager {
    frames: Mutex<HashMap<WindowId, IndexMap<String, BufferedOp>>>,
}

impl TransactionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starting a transaction while one is already open for `window_id` is a
    /// no-op: the existing buffer is preserved.
    pub fn start(&self, window_id: WindowId) {
        let mut frames = self.frames.lock();
        if frames.contains_key(&window_id) {
            tracing::warn!(%window_id, "transaction already in progress, ignoring start");
            return;
        }
        frames.insert(window_id, IndexMap::new());
    }

    pub fn has_active(&self, window_id: &WindowId) -> bool {
        self.frames.lock().contains_key(window_id)
    }

    /// Buffers `op` under `key` if `window_id` has an active transaction.
    /// Returns whether it was buffered.
    pub fn add(&self, window_id: &WindowId, key: &str, op: BufferedOp) -> bool {
        let mut frames = self.frames.lock();
        let Some(frame) = frames.get_mut(window_id) else { return false };
        frame.insert(key.to_string(), op);
        true
    }

    /// Removes and returns the buffered frame in insertion order, or `None`
    /// if no transaction was active.
    pub fn commit(&self, window_id: &WindowId) -> Option<IndexMap<String, BufferedOp>> {
        self.frames.lock().remove(window_id)
    }

    pub fn rollback(&self, window_id: &WindowId) {
        self.frames.lock().remove(window_id);
    }

    /// `Some(Some(value))` for a buffered set, `Some(None)` for a buffered
    /// delete, `None` if `key` has no pending write.
    pub fn buffered_value(&self, window_id: &WindowId, key: &str) -> Option<Option<Value>> {
        let frames = self.frames.lock();
        let op = frames.get(window_id)?.get(key)?;
        Some(match op {
            BufferedOp::Set(value) => Some(value.clone()),
            BufferedOp::Delete => None,
        })
    }
}

#[cfg(test)]
#[path = "transaction_tests.rs"]
mod tests;
