// SPDX-License-Identifier: MIT

//! Tracks which windows are subscribed to which keys, for targeted
//! broadcast routing.

use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use wk_core::WindowId;

pub const DEFAULT_SUBSCRIBER_WARN_THRESHOLD: usize = 100;

pub struct SubscriptionManager {
    by_key: Mutex<HashMap<String, HashSet<WindowId>>>,
    warned: Mutex<HashMap<String, AtomicBool>>,
    warn_threshold: usize,
}

impl Default for SubscriptionManager {
    fn default() -> Self {
        Self::with_warn_threshold(DEFAULT_SUBSCRIBER_WARN_THRESHOLD)
    }
}

impl SubscriptionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_warn_threshold(warn_threshold: usize) -> Self {
        Self { by_key: Mutex::new(HashMap::new()), warned: Mutex::new(HashMap::new()), warn_threshold }
    }

    pub fn subscribe(&self, window_id: WindowId, key: &str) {
        let count = {
            let mut by_key = self.by_key.lock();
            let set = by_key.entry(key.to_string()).or_default();
            set.insert(window_id);
            set.len()
        };

        if count >= self.warn_threshold {
            let mut warned = self.warned.lock();
            let flag = warned.entry(key.to_string()).or_insert_with(|| AtomicBool::new(false));
            if !flag.swap(true, Ordering::Relaxed) {
                tracing::warn!(key, count, "key has an unusually high number of subscribers, possible leak");
            }
        }
    }

    pub fn unsubscribe(&self, window_id: &WindowId, key: &str) {
        let mut by_key = self.by_key.lock();
        if let Some(set) = by_key.get_mut(key) {
            set.remove(window_id);
            if set.is_empty() {
                by_key.remove(key);
                self.warned.lock().remove(key);
            }
        }
    }

    pub fn remove_window(&self, window_id: &WindowId) {
        let mut by_key = self.by_key.lock();
        by_key.retain(|_, set| {
            set.remove(window_id);
            !set.is_empty()
        });
    }

    pub fn subscribers(&self, key: &str) -> Vec<WindowId> {
        self.by_key.lock().get(key).map(|set| set.iter().cloned().collect()).unwrap_or_default()
    }

    pub fn has_subscribers(&self, key: &str) -> bool {
        self.by_key.lock().get(key).is_some_and(|set| !set.is_empty())
    }
}

#[cfg(test)]
#[path = "subscription_tests.rs"]
mod tests;
