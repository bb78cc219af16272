// SPDX-License-Identifier: MIT

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::id::WindowId;

/// A fixed, readable id for assertions that don't care about uniqueness.
pub fn fixed_window_id(tag: &str) -> WindowId {
    WindowId::from_string(format!("test-{tag}"))
}
