// SPDX-License-Identifier: MIT

//! Guarded wrappers over host window operations: every call first checks
//! the target is live, then silently no-ops if not. Holds no state of its
//! own beyond the registry it reads from.

use std::sync::Arc;
use wk_core::{HostWindow, KitError, WindowId};

use crate::registry::WindowRegistry;

#[derive(Clone)]
pub struct WindowOperator {
    registry: WindowRegistry,
}

impl WindowOperator {
    pub fn new(registry: WindowRegistry) -> Self {
        Self { registry }
    }

    fn live(&self, id: &WindowId) -> Option<Arc<dyn HostWindow>> {
        let window = self.registry.get_by_id(id)?;
        if window.is_destroyed() {
            return None;
        }
        Some(window)
    }

    pub fn show(&self, id: &WindowId) {
        if let Some(w) = self.live(id) {
            w.show();
        }
    }

    pub fn hide(&self, id: &WindowId) {
        if let Some(w) = self.live(id) {
            w.hide();
        }
    }

    pub fn minimize(&self, id: &WindowId) {
        if let Some(w) = self.live(id) {
            w.minimize();
        }
    }

    pub fn restore(&self, id: &WindowId) {
        if let Some(w) = self.live(id) {
            w.restore();
        }
    }

    pub fn maximize(&self, id: &WindowId) {
        if let Some(w) = self.live(id) {
            w.maximize();
        }
    }

    pub fn unmaximize(&self, id: &WindowId) {
        if let Some(w) = self.live(id) {
            w.unmaximize();
        }
    }

    pub fn toggle_fullscreen(&self, id: &WindowId) {
        if let Some(w) = self.live(id) {
            w.set_fullscreen(!w.is_fullscreen());
        }
    }

    pub fn focus(&self, id: &WindowId) {
        if let Some(w) = self.live(id) {
            w.focus();
        }
    }

    pub fn close(&self, id: &WindowId) {
        if let Some(w) = self.live(id) {
            w.close();
        }
    }

    pub fn destroy(&self, id: &WindowId) {
        if let Some(w) = self.live(id) {
            w.destroy();
        }
    }

    pub async fn send(&self, id: &WindowId, channel: &str, data: Vec<u8>) -> Result<(), KitError> {
        match self.live(id) {
            Some(w) => w.send(channel, data).await,
            None => Err(KitError::transport(format!("send to destroyed or unknown window {id}"))),
        }
    }

    pub fn open_dev_tools(&self, id: &WindowId) {
        if let Some(w) = self.live(id) {
            w.open_dev_tools();
        }
    }

    pub fn close_dev_tools(&self, id: &WindowId) {
        if let Some(w) = self.live(id) {
            w.close_dev_tools();
        }
    }

    pub fn is_dev_tools_opened(&self, id: &WindowId) -> bool {
        self.live(id).map(|w| w.is_dev_tools_opened()).unwrap_or(false)
    }
}

#[cfg(test)]
#[path = "operator_tests.rs"]
mod tests;
