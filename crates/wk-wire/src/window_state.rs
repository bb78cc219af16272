// SPDX-License-Identifier: MIT

//! The persisted-geometry record written to the window-state file.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
pub use wk_core::DisplayBounds;

/// Persisted geometry for one named window, keyed by window name in the
/// state file's top-level object.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WindowStateRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<i32>,
    pub width: u32,
    pub height: u32,
    #[serde(rename = "isMaximized", default)]
    pub is_maximized: bool,
    #[serde(rename = "isFullScreen", default)]
    pub is_full_screen: bool,
    #[serde(rename = "displayBounds", default, skip_serializing_if = "Option::is_none")]
    pub display_bounds: Option<DisplayBounds>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<String>>,
}

impl WindowStateRecord {
    pub fn has_position(&self) -> bool {
        self.x.is_some() && self.y.is_some()
    }

    /// Geometry restoration rule: valid iff `display_bounds` matches some
    /// current display exactly, or the window rectangle intersects any
    /// current display. Maximized/full-screen flags are preserved only
    /// alongside a valid rectangle.
    pub fn is_valid_for(&self, displays: &[DisplayBounds]) -> bool {
        if !self.has_position() {
            return false;
        }
        if let Some(bounds) = &self.display_bounds {
            if displays.iter().any(|d| d.matches(bounds)) {
                return true;
            }
        }
        let (Some(x), Some(y)) = (self.x, self.y) else { return false };
        displays.iter().any(|d| d.intersects(x, y, self.width, self.height))
    }
}

/// The on-disk shape of the window-state file: `{<name>: <WindowStateRecord>}`.
pub type WindowStateFile = BTreeMap<String, WindowStateRecord>;

#[cfg(test)]
#[path = "window_state_tests.rs"]
mod tests;
