// SPDX-License-Identifier: MIT

//! Atomic, dirty-checked persistence of per-window geometry.

use crate::config::{FlushStrategy, StateKeeperConfig};
use crate::path_lock::PathLock;
use parking_lot::Mutex;
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use wk_core::Clock;
use wk_wire::{WindowStateFile, WindowStateRecord};

/// Cadence for re-checking the debounce/throttle window against the clock.
/// Real time, not `Clock`: only the elapsed-time comparison is test-controlled.
const FLUSH_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Keeps an in-memory map of per-window geometry in sync with a JSON file,
/// batching writes behind a debounce or throttle window.
///
/// Cloning shares the underlying state and scheduling flags; the process-wide
/// path claim is only released once the last clone is dropped.
pub struct StateKeeper<C: Clock = wk_core::SystemClock> {
    clock: C,
    path: PathBuf,
    strategy: FlushStrategy,
    state: Arc<Mutex<WindowStateFile>>,
    last_flushed_hash: Arc<Mutex<Option<[u8; 32]>>>,
    dirty_at: Arc<Mutex<Option<Instant>>>,
    pending_write: Arc<AtomicBool>,
    flush_in_flight: Arc<AtomicBool>,
    _path_lock: Arc<PathLock>,
}

impl<C: Clock> Clone for StateKeeper<C> {
    fn clone(&self) -> Self {
        Self {
            clock: self.clock.clone(),
            path: self.path.clone(),
            strategy: self.strategy,
            state: self.state.clone(),
            last_flushed_hash: self.last_flushed_hash.clone(),
            dirty_at: self.dirty_at.clone(),
            pending_write: self.pending_write.clone(),
            flush_in_flight: self.flush_in_flight.clone(),
            _path_lock: self._path_lock.clone(),
        }
    }
}

impl<C: Clock> StateKeeper<C> {
    /// Opens the state file at `config.path`, tolerating a missing or
    /// corrupt file by starting from an empty map.
    pub fn open(config: StateKeeperConfig, clock: C) -> Self {
        let state = load_or_default(&config.path);
        Self {
            clock,
            path: config.path.clone(),
            strategy: config.strategy,
            state: Arc::new(Mutex::new(state)),
            last_flushed_hash: Arc::new(Mutex::new(None)),
            dirty_at: Arc::new(Mutex::new(None)),
            pending_write: Arc::new(AtomicBool::new(false)),
            flush_in_flight: Arc::new(AtomicBool::new(false)),
            _path_lock: Arc::new(PathLock::acquire(&config.path)),
        }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    pub fn get(&self, name: &str) -> Option<WindowStateRecord> {
        self.state.lock().get(name).cloned()
    }

    pub fn snapshot(&self) -> WindowStateFile {
        self.state.lock().clone()
    }

    /// Records `record` under `name` if it differs from the cached value,
    /// then schedules a flush. Returns whether it was dirty (and therefore
    /// scheduled a flush).
    pub fn save_state(&self, name: impl Into<String>, record: WindowStateRecord) -> bool {
        let name = name.into();
        {
            let mut state = self.state.lock();
            if state.get(&name) == Some(&record) {
                return false;
            }
            state.insert(name, record);
        }
        self.schedule_flush();
        true
    }

    /// Schedules an async flush according to the configured strategy. A
    /// flush already in flight is not duplicated; instead `pending_write`
    /// is set so the in-flight flush re-dispatches itself once done.
    ///
    /// Debounce resets the quiet-period clock on every dirty write; throttle
    /// anchors it to the first dirty write of the window so the flush still
    /// lands at most once per `delay_ms` under sustained writes.
    pub fn schedule_flush(&self) {
        match self.strategy {
            FlushStrategy::Debounce { .. } => *self.dirty_at.lock() = Some(self.clock.now()),
            FlushStrategy::Throttle { .. } => {
                let mut dirty_at = self.dirty_at.lock();
                if dirty_at.is_none() {
                    *dirty_at = Some(self.clock.now());
                }
            }
        }
        if self.flush_in_flight.swap(true, Ordering::SeqCst) {
            self.pending_write.store(true, Ordering::SeqCst);
            return;
        }
        let keeper = self.clone();
        tokio::spawn(async move {
            keeper.run_flush_cycle().await;
        });
    }

    /// Blocks until the configured delay has elapsed since the last dirty
    /// write, as measured by `clock`. Polled on a short real-time cadence so
    /// a `FakeClock` advanced mid-wait is picked up without a real sleep of
    /// the full delay.
    async fn wait_for_window(&self) {
        let delay = self.strategy.delay();
        loop {
            let Some(dirty_at) = *self.dirty_at.lock() else { return };
            if self.clock.now().saturating_duration_since(dirty_at) >= delay {
                return;
            }
            tokio::time::sleep(FLUSH_POLL_INTERVAL).await;
        }
    }

    async fn run_flush_cycle(&self) {
        loop {
            self.wait_for_window().await;
            *self.dirty_at.lock() = None;
            if let Err(err) = self.do_flush().await {
                tracing::warn!(path = %self.path.display(), error = %err, "state keeper flush failed");
            }
            if self.pending_write.swap(false, Ordering::SeqCst) {
                continue;
            }
            break;
        }
        self.flush_in_flight.store(false, Ordering::SeqCst);
    }

    /// Synchronous, unscheduled flush for process-exit shutdown. Bypasses
    /// the debounce/throttle window and writes on the calling task.
    pub async fn flush_now(&self) {
        if let Err(err) = self.do_flush().await {
            tracing::warn!(path = %self.path.display(), error = %err, "state keeper final flush failed");
        }
    }

    async fn do_flush(&self) -> std::io::Result<()> {
        let snapshot = self.snapshot();
        let json = serde_json::to_vec(&snapshot)?;
        let hash: [u8; 32] = Sha256::digest(&json).into();

        if *self.last_flushed_hash.lock() == Some(hash) {
            return Ok(());
        }

        let tmp_path = self.path.with_extension("tmp");
        tokio::fs::write(&tmp_path, &json).await?;
        match tokio::fs::rename(&tmp_path, &self.path).await {
            Ok(()) => {
                *self.last_flushed_hash.lock() = Some(hash);
                Ok(())
            }
            Err(err) => {
                let _ = tokio::fs::remove_file(&tmp_path).await;
                Err(err)
            }
        }
    }

    #[cfg(test)]
    fn path_lock_held(&self) -> bool {
        self._path_lock.is_held()
    }
}

fn load_or_default(path: &std::path::Path) -> WindowStateFile {
    std::fs::read(path).ok().and_then(|bytes| serde_json::from_slice(&bytes).ok()).unwrap_or_default()
}

#[cfg(test)]
#[path = "state_keeper_tests.rs"]
mod tests;
