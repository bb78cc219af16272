// SPDX-License-Identifier: MIT

//! Plugin-hooked window creation and destruction: the cancellation sentinel,
//! the ordered hook runner, and the lifecycle orchestrator built on top of
//! `wk-registry`'s `WindowStore`.

pub mod executor;
pub mod lifecycle;
pub mod plugin;

pub use executor::PluginExecutor;
pub use lifecycle::WindowLifecycle;
pub use plugin::{HookOutcome, Plugin};
