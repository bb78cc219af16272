// SPDX-License-Identifier: MIT

//! Binds registry entries to a `StateKeeper`, translating host window
//! geometry events into persisted, display-validated state.

use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use wk_core::{Clock, DisplayProvider, WindowId};
use wk_storage::StateKeeper;
use wk_wire::WindowStateRecord;

use crate::registry::WindowRegistry;

/// The host geometry event that triggered a state save, or a teardown
/// signal that detaches tracking for the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryEvent {
    Resize,
    Move,
    Maximize,
    Unmaximize,
    EnterFullScreen,
    LeaveFullScreen,
    Close,
}

pub struct WindowStateManager<C: Clock = wk_core::SystemClock> {
    registry: WindowRegistry,
    state_keeper: StateKeeper<C>,
    displays: Arc<dyn DisplayProvider>,
    managed: Mutex<HashSet<WindowId>>,
}

impl<C: Clock> WindowStateManager<C> {
    pub fn new(registry: WindowRegistry, state_keeper: StateKeeper<C>, displays: Arc<dyn DisplayProvider>) -> Self {
        Self { registry, state_keeper, displays, managed: Mutex::new(HashSet::new()) }
    }

    /// Starts tracking geometry events for `id` under `name`. Re-managing
    /// the same window first detaches it.
    pub fn manage(&self, id: WindowId, name: &str) {
        self.unmanage(&id);
        self.managed.lock().insert(id.clone());
        tracing::debug!(%id, name, "state manager now tracking window");
    }

    pub fn unmanage(&self, id: &WindowId) {
        self.managed.lock().remove(id);
    }

    pub fn is_managed(&self, id: &WindowId) -> bool {
        self.managed.lock().contains(id)
    }

    /// Called by the host runtime whenever one of the tracked geometry
    /// events fires for a managed window.
    pub fn on_event(&self, id: &WindowId, name: &str, event: GeometryEvent) {
        if !self.is_managed(id) {
            return;
        }
        if event == GeometryEvent::Close {
            self.unmanage(id);
            return;
        }
        let Some(window) = self.registry.get_by_id(id) else { return };

        let bounds = window.bounds();
        let display_bounds = self.displays.displays().into_iter().find(|d| d.intersects(
            bounds.x,
            bounds.y,
            bounds.width,
            bounds.height,
        ));
        let groups: Vec<String> = self.registry.window_groups(id).into_iter().collect();

        let record = WindowStateRecord {
            x: Some(bounds.x),
            y: Some(bounds.y),
            width: bounds.width,
            height: bounds.height,
            is_maximized: window.is_maximized(),
            is_full_screen: window.is_fullscreen(),
            display_bounds,
            groups: if groups.is_empty() { None } else { Some(groups) },
        };
        self.state_keeper.save_state(name, record);
    }

    /// Restores validated geometry for `name`, falling back to the given
    /// defaults if no saved state exists or it no longer fits any display.
    pub fn restore(&self, name: &str, default_width: u32, default_height: u32) -> WindowStateRecord {
        let displays = self.displays.displays();
        match self.state_keeper.get(name) {
            Some(record) if record.is_valid_for(&displays) => record,
            _ => WindowStateRecord { width: default_width, height: default_height, ..Default::default() },
        }
    }
}

#[cfg(test)]
#[path = "state_manager_tests.rs"]
mod tests;
