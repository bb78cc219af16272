// SPDX-License-Identifier: MIT

//! Bidirectional id/name/group maps over live host windows, with a ghost
//! sweeper that reclaims entries the host destroyed without going through
//! `unregister`.

use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};
use wk_core::{HostWindow, WindowId};

const CHUNK_SIZE: usize = 50;

struct Entry {
    name: String,
    window: Arc<dyn HostWindow>,
    groups: HashSet<String>,
    #[allow(dead_code)]
    created_at: Instant,
}

struct CleanupHandle(Option<tokio::task::JoinHandle<()>>);

impl Drop for CleanupHandle {
    fn drop(&mut self) {
        if let Some(handle) = self.0.take() {
            handle.abort();
        }
    }
}

struct Inner {
    by_id: Mutex<HashMap<WindowId, Entry>>,
    by_name: Mutex<HashMap<String, WindowId>>,
    group_forward: Mutex<HashMap<String, HashSet<WindowId>>>,
    cleanup: Mutex<CleanupHandle>,
}

/// Cloning shares the same underlying maps; the cleanup sweeper task is
/// owned by the last clone standing and aborted when it drops.
#[derive(Clone)]
pub struct WindowRegistry {
    inner: Arc<Inner>,
}

impl WindowRegistry {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                by_id: Mutex::new(HashMap::new()),
                by_name: Mutex::new(HashMap::new()),
                group_forward: Mutex::new(HashMap::new()),
                cleanup: Mutex::new(CleanupHandle(None)),
            }),
        }
    }

    pub fn register(&self, id: WindowId, name: impl Into<String>, window: Arc<dyn HostWindow>) {
        let name = name.into();
        let entry = Entry { name: name.clone(), window, groups: HashSet::new(), created_at: Instant::now() };
        self.inner.by_id.lock().insert(id.clone(), entry);
        self.inner.by_name.lock().insert(name, id);
    }

    pub fn unregister(&self, id: &WindowId) {
        let removed = self.inner.by_id.lock().remove(id);
        let Some(entry) = removed else { return };
        self.inner.by_name.lock().remove(&entry.name);
        let mut forward = self.inner.group_forward.lock();
        for group in &entry.groups {
            if let Some(ids) = forward.get_mut(group) {
                ids.remove(id);
                if ids.is_empty() {
                    forward.remove(group);
                }
            }
        }
    }

    pub fn get_by_id(&self, id: &WindowId) -> Option<Arc<dyn HostWindow>> {
        self.inner.by_id.lock().get(id).map(|e| e.window.clone())
    }

    pub fn get_by_name(&self, name: &str) -> Option<Arc<dyn HostWindow>> {
        let id = self.inner.by_name.lock().get(name).cloned()?;
        self.get_by_id(&id)
    }

    pub fn get_id_by_name(&self, name: &str) -> Option<WindowId> {
        self.inner.by_name.lock().get(name).cloned()
    }

    pub fn get_id_by_window(&self, window: &Arc<dyn HostWindow>) -> Option<WindowId> {
        self.inner
            .by_id
            .lock()
            .iter()
            .find(|(_, entry)| Arc::ptr_eq(&entry.window, window))
            .map(|(id, _)| id.clone())
    }

    pub fn add_to_group(&self, id: &WindowId, group: impl Into<String>) {
        let group = group.into();
        let mut by_id = self.inner.by_id.lock();
        let Some(entry) = by_id.get_mut(id) else { return };
        entry.groups.insert(group.clone());
        drop(by_id);
        self.inner.group_forward.lock().entry(group).or_default().insert(id.clone());
    }

    pub fn remove_from_group(&self, id: &WindowId, group: &str) {
        let mut by_id = self.inner.by_id.lock();
        let Some(entry) = by_id.get_mut(id) else { return };
        entry.groups.remove(group);
        drop(by_id);
        let mut forward = self.inner.group_forward.lock();
        if let Some(ids) = forward.get_mut(group) {
            ids.remove(id);
            if ids.is_empty() {
                forward.remove(group);
            }
        }
    }

    pub fn group_ids(&self, group: &str) -> Vec<WindowId> {
        self.inner.group_forward.lock().get(group).map(|ids| ids.iter().cloned().collect()).unwrap_or_default()
    }

    pub fn window_groups(&self, id: &WindowId) -> HashSet<String> {
        self.inner.by_id.lock().get(id).map(|e| e.groups.clone()).unwrap_or_default()
    }

    pub fn all_ids(&self) -> Vec<WindowId> {
        self.inner.by_id.lock().keys().cloned().collect()
    }

    pub fn count(&self) -> usize {
        self.inner.by_id.lock().len()
    }

    /// Starts the periodic ghost sweeper. A previously running sweeper is
    /// aborted first.
    pub fn start_cleanup(&self, interval: Duration) {
        self.stop_cleanup();
        let registry = self.clone();
        let handle = tokio::spawn(async move {
            loop {
                tokio::time::sleep(interval).await;
                registry.sweep().await;
            }
        });
        self.inner.cleanup.lock().0 = Some(handle);
    }

    pub fn stop_cleanup(&self) {
        if let Some(handle) = self.inner.cleanup.lock().0.take() {
            handle.abort();
        }
    }

    async fn sweep(&self) {
        let ids: Vec<WindowId> = self.all_ids();
        for (i, id) in ids.into_iter().enumerate() {
            let destroyed = self.inner.by_id.lock().get(&id).map(|e| e.window.is_destroyed());
            if destroyed == Some(true) {
                self.unregister(&id);
            }
            if (i + 1) % CHUNK_SIZE == 0 {
                tokio::task::yield_now().await;
            }
        }
    }
}

impl Default for WindowRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
