// SPDX-License-Identifier: MIT

//! The plugin contract and the typed cancellation sentinel that replaces a
//! falsy return value at the creation-gate hook.

use async_trait::async_trait;
use wk_core::{KitError, WindowConfig, WindowId};

/// The result of a `will_create` hook.
#[derive(Debug, Clone, PartialEq)]
pub enum HookOutcome {
    /// Proceed to the next hook, or to construction if this was the last one.
    Continue,
    /// Abort creation entirely.
    Cancelled,
    /// Proceed, but swap in this config for every hook still to run.
    Replace(WindowConfig),
}

/// A lifecycle plugin. Every hook is optional; the default implementation is
/// a no-op that continues.
#[async_trait]
pub trait Plugin: Send + Sync + 'static {
    fn name(&self) -> &str;

    async fn on_init(&self) {}

    async fn on_will_create(&self, _config: &WindowConfig) -> HookOutcome {
        HookOutcome::Continue
    }

    async fn on_did_create(&self, _id: &WindowId) -> Result<(), KitError> {
        Ok(())
    }

    async fn on_will_destroy(&self, _id: &WindowId) -> Result<(), KitError> {
        Ok(())
    }

    async fn on_did_destroy(&self, _id: &WindowId) -> Result<(), KitError> {
        Ok(())
    }
}

#[cfg(test)]
#[path = "plugin_tests.rs"]
mod tests;
