// SPDX-License-Identifier: MIT

//! Permissioned key/value storage: the bus's single source of truth for
//! state shared across windows.

use parking_lot::RwLock;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use wk_core::{KitError, WindowId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
    Modify,
    Delete,
}

#[derive(Debug, Clone, Default)]
pub struct KeyPermission {
    pub readonly: bool,
    pub allowed_windows: Option<HashSet<WindowId>>,
}

#[derive(Default)]
pub struct DataStoreManager {
    values: RwLock<HashMap<String, Value>>,
    permissions: RwLock<HashMap<String, KeyPermission>>,
}

impl DataStoreManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.values.read().get(key).cloned()
    }

    pub fn get_all(&self) -> HashMap<String, Value> {
        self.values.read().clone()
    }

    /// Permission metadata for `key` is preserved across overwrites.
    pub fn set(&self, key: &str, value: Value) -> Option<Value> {
        self.values.write().insert(key.to_string(), value)
    }

    pub fn delete(&self, key: &str) -> Option<Value> {
        self.values.write().remove(key)
    }

    pub fn set_permission(&self, key: impl Into<String>, permission: KeyPermission) {
        self.permissions.write().insert(key.into(), permission);
    }

    /// A key with no permission entry always allows. Otherwise: readonly
    /// denies every modify/delete; an `allowed_windows` set denies windows
    /// not in it; anything else is allowed.
    pub fn check_permission(&self, key: &str, window_id: Option<&WindowId>, op: StoreOp) -> Result<(), KitError> {
        let permissions = self.permissions.read();
        let Some(permission) = permissions.get(key) else { return Ok(()) };

        if permission.readonly {
            return Err(KitError::permission(format!("Field \"{key}\" is readonly")));
        }

        if let (Some(allowed), Some(window_id)) = (&permission.allowed_windows, window_id) {
            if !allowed.contains(window_id) {
                let verb = match op {
                    StoreOp::Modify => "modify",
                    StoreOp::Delete => "delete",
                };
                return Err(KitError::permission(format!("Window \"{window_id}\" is not allowed to {verb} \"{key}\"")));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "data_store_tests.rs"]
mod tests;
