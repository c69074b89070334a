// file: src/watcher/tracker.rs
// description: in-flight and completed path sets guarding against double publishing
// reference: https://doc.rust-lang.org/std/sync/struct.Mutex.html

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

#[derive(Debug, Default)]
struct TrackerState {
    processing: HashSet<PathBuf>,
    processed: HashSet<PathBuf>,
}

/// One lock over both sets; admission is a single check-and-insert.
#[derive(Debug, Default)]
pub struct SubmissionTracker {
    state: Mutex<TrackerState>,
}

impl SubmissionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, TrackerState> {
        // sets stay consistent even if a holder panicked
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Admits `path` unless it is in flight or already completed.
    pub fn try_admit(&self, path: &Path) -> bool {
        let mut state = self.lock();
        if state.processing.contains(path) || state.processed.contains(path) {
            debug!("Rejecting duplicate submission: {}", path.display());
            return false;
        }
        state.processing.insert(path.to_path_buf());
        true
    }

    /// Ends an attempt. Successful paths are never admitted again.
    pub fn release(&self, path: &Path, success: bool) {
        let mut state = self.lock();
        state.processing.remove(path);
        if success {
            state.processed.insert(path.to_path_buf());
        }
    }

    pub fn is_completed(&self, path: &Path) -> bool {
        self.lock().processed.contains(path)
    }

    pub fn is_in_flight(&self, path: &Path) -> bool {
        self.lock().processing.contains(path)
    }

    pub fn in_flight_count(&self) -> usize {
        self.lock().processing.len()
    }

    pub fn completed_count(&self) -> usize {
        self.lock().processed.len()
    }

    /// Guarded admission: the returned [`Admission`] releases the path as
    /// unsuccessful when dropped without [`Admission::complete`].
    pub fn admit(self: &Arc<Self>, path: &Path) -> Option<Admission> {
        self.try_admit(path).then(|| Admission {
            tracker: Arc::clone(self),
            path: path.to_path_buf(),
            released: false,
        })
    }
}

#[derive(Debug)]
pub struct Admission {
    tracker: Arc<SubmissionTracker>,
    path: PathBuf,
    released: bool,
}

impl Admission {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn complete(mut self) {
        self.finish(true);
    }

    pub fn fail(mut self) {
        self.finish(false);
    }

    fn finish(&mut self, success: bool) {
        if !self.released {
            self.tracker.release(&self.path, success);
            self.released = true;
        }
    }
}

impl Drop for Admission {
    fn drop(&mut self) {
        self.finish(false);
    }
}
