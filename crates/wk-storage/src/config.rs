// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// How a `StateKeeper` schedules disk flushes after a dirty `save_state`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FlushStrategy {
    /// Wait for a quiet period of `delay_ms` with no further saves.
    Debounce { delay_ms: u64 },
    /// Flush at most once per `delay_ms` window, regardless of save rate.
    Throttle { delay_ms: u64 },
}

impl FlushStrategy {
    pub fn delay(self) -> Duration {
        match self {
            FlushStrategy::Debounce { delay_ms } | FlushStrategy::Throttle { delay_ms } => {
                Duration::from_millis(delay_ms)
            }
        }
    }
}

impl Default for FlushStrategy {
    fn default() -> Self {
        FlushStrategy::Debounce { delay_ms: 500 }
    }
}

/// Configuration for a `StateKeeper` instance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StateKeeperConfig {
    pub path: PathBuf,
    #[serde(default)]
    pub strategy: FlushStrategy,
}

impl Default for StateKeeperConfig {
    fn default() -> Self {
        Self { path: PathBuf::from("window-state.json"), strategy: FlushStrategy::default() }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
