// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};

use crate::subscription::DEFAULT_SUBSCRIBER_WARN_THRESHOLD;

/// Configuration for a `MessageBus` instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusConfig {
    /// Logs once per key when its subscriber count reaches this threshold.
    #[serde(default = "default_warn_threshold")]
    pub subscriber_warn_threshold: usize,
}

fn default_warn_threshold() -> usize {
    DEFAULT_SUBSCRIBER_WARN_THRESHOLD
}

impl Default for BusConfig {
    fn default() -> Self {
        Self { subscriber_warn_threshold: DEFAULT_SUBSCRIBER_WARN_THRESHOLD }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
