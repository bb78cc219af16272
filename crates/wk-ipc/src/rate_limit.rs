// SPDX-License-Identifier: MIT

//! Fixed-window rate limiting keyed by an arbitrary caller-chosen string,
//! with a periodic sweeper that reclaims expired windows.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use wk_core::Clock;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RateLimitConfig {
    pub limit: u32,
    #[serde(rename = "interval_ms", with = "duration_millis")]
    pub interval: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self { limit: 60, interval: Duration::from_secs(60) }
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(deserializer)?))
    }
}

const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

struct Window {
    count: u32,
    resets_at_ms: u64,
}

struct CleanupHandle(Option<tokio::task::JoinHandle<()>>);

impl Drop for CleanupHandle {
    fn drop(&mut self) {
        if let Some(handle) = self.0.take() {
            handle.abort();
        }
    }
}

struct Inner<C: Clock> {
    clock: C,
    default_config: RateLimitConfig,
    rules: Mutex<HashMap<String, RateLimitConfig>>,
    windows: Mutex<HashMap<String, Window>>,
    sweeper: Mutex<CleanupHandle>,
}

/// Cloning shares the underlying window map; the sweeper is owned by the
/// last clone standing and aborted when it drops.
#[derive(Clone)]
pub struct RateLimiter<C: Clock = wk_core::SystemClock> {
    inner: Arc<Inner<C>>,
}

impl<C: Clock> RateLimiter<C> {
    pub fn new(clock: C, default_config: RateLimitConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                clock,
                default_config,
                rules: Mutex::new(HashMap::new()),
                windows: Mutex::new(HashMap::new()),
                sweeper: Mutex::new(CleanupHandle(None)),
            }),
        }
    }

    pub fn set_rule(&self, rule_key: impl Into<String>, config: RateLimitConfig) {
        self.inner.rules.lock().insert(rule_key.into(), config);
    }

    pub fn remove_rule(&self, rule_key: &str) {
        self.inner.rules.lock().remove(rule_key);
    }

    fn config_for(&self, rule_key: &str) -> RateLimitConfig {
        self.inner.rules.lock().get(rule_key).copied().unwrap_or(self.inner.default_config)
    }

    /// Returns `true` if `key` is still within its `rule_key` budget,
    /// incrementing the window's counter as a side effect.
    pub fn check(&self, key: &str, rule_key: &str) -> bool {
        let config = self.config_for(rule_key);
        let now = self.inner.clock.epoch_ms();
        let mut windows = self.inner.windows.lock();
        let window = windows.entry(key.to_string()).or_insert(Window { count: 0, resets_at_ms: now + config.interval.as_millis() as u64 });

        if now > window.resets_at_ms {
            window.count = 0;
            window.resets_at_ms = now + config.interval.as_millis() as u64;
        }

        if window.count >= config.limit {
            tracing::warn!(key, rule_key, "rate limit exceeded");
            return false;
        }
        window.count += 1;
        true
    }

    /// Starts the periodic sweeper that reclaims expired windows (default
    /// interval 60s if `None`). A previously running sweeper is aborted first.
    pub fn start_sweeper(&self, interval: Option<Duration>) {
        self.stop_sweeper();
        let limiter = self.clone();
        let interval = interval.unwrap_or(DEFAULT_SWEEP_INTERVAL);
        let handle = tokio::spawn(async move {
            loop {
                tokio::time::sleep(interval).await;
                limiter.sweep();
            }
        });
        self.inner.sweeper.lock().0 = Some(handle);
    }

    pub fn stop_sweeper(&self) {
        if let Some(handle) = self.inner.sweeper.lock().0.take() {
            handle.abort();
        }
    }

    fn sweep(&self) {
        let now = self.inner.clock.epoch_ms();
        self.inner.windows.lock().retain(|_, window| now <= window.resets_at_ms);
    }
}

#[cfg(test)]
#[path = "rate_limit_tests.rs"]
mod tests;
