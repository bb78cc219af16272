// SPDX-License-Identifier: MIT

//! The kit's single configuration surface: plain, `serde`-deserializable
//! structs with defaults matching the individually-documented subsystem
//! defaults, plus a pre-flight `validate()`.

use serde::{Deserialize, Serialize};
use wk_bus::BusConfig;
use wk_core::KitError;
use wk_ipc::RouterConfig;
use wk_registry::WindowStoreConfig;
use wk_storage::StateKeeperConfig;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolkitConfig {
    #[serde(default)]
    pub router: RouterConfig,
    #[serde(default)]
    pub bus: BusConfig,
    #[serde(default)]
    pub window_store: WindowStoreConfig,
    #[serde(default)]
    pub state_keeper: StateKeeperConfig,
    /// Enables dev tools on created windows and exposes the debug
    /// introspection handles on the `Toolkit`.
    #[serde(default)]
    pub development: bool,
}

impl ToolkitConfig {
    /// Catches configuration combinations that would make startup pointless
    /// or silently wrong, before any subsystem is constructed.
    pub fn validate(&self) -> Result<(), KitError> {
        if self.window_store.max_windows == Some(0) {
            return Err(KitError::validation("window_store.max_windows must not be zero"));
        }
        if self.router.default_rate_limit.limit == 0 {
            return Err(KitError::validation("router.default_rate_limit.limit must not be zero"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
