// SPDX-License-Identifier: MIT

//! Process-wide guard preventing two `StateKeeper` instances from claiming
//! the same persistence file.

use parking_lot::Mutex;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

static ACTIVE_PATHS: OnceLock<Mutex<HashSet<PathBuf>>> = OnceLock::new();

fn registry() -> &'static Mutex<HashSet<PathBuf>> {
    ACTIVE_PATHS.get_or_init(|| Mutex::new(HashSet::new()))
}

/// Holds a claim on a path for as long as it lives. A second claim on the
/// same path logs a warning and is released as a no-op: it never inserted
/// into the registry, so its `Drop` has nothing to remove.
pub struct PathLock {
    path: PathBuf,
    held: bool,
}

impl PathLock {
    pub fn acquire(path: &Path) -> Self {
        let mut paths = registry().lock();
        if paths.insert(path.to_path_buf()) {
            Self { path: path.to_path_buf(), held: true }
        } else {
            tracing::warn!(path = %path.display(), "state keeper already active for this path");
            Self { path: path.to_path_buf(), held: false }
        }
    }

    #[cfg(test)]
    pub fn is_held(&self) -> bool {
        self.held
    }
}

impl Drop for PathLock {
    fn drop(&mut self) {
        if self.held {
            registry().lock().remove(&self.path);
        }
    }
}

#[cfg(test)]
#[path = "path_lock_tests.rs"]
mod tests;
