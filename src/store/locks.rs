//! Opt-in per-collection mutual exclusion.
//!
//! The store makes no concurrency guarantee by default: two simultaneous
//! mutations on one collection race as a classic lost update, exactly like
//! the single-process original. A [`LockRegistry`] hardens that for callers
//! that share one store across request handlers: each collection path gets
//! its own mutex, held for the whole load-mutate-persist cycle. This is
//! in-process only; it does not coordinate across processes.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

/// Path-keyed registry of collection mutexes.
#[derive(Debug, Default)]
pub struct LockRegistry {
    inner: Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>,
}

impl LockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The mutex guarding one collection, created on first use.
    ///
    /// Entries are never evicted; a store sees a bounded set of collection
    /// paths over its lifetime.
    pub fn handle(&self, path: &Path) -> Arc<Mutex<()>> {
        let mut map = self
            .inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        map.entry(path.to_path_buf())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

/// Lock a collection mutex, recovering from a poisoned lock.
///
/// A panic inside a previous critical section leaves no partial in-memory
/// state behind (the cycle re-reads from disk), so continuing is safe.
pub fn acquire(handle: &Arc<Mutex<()>>) -> MutexGuard<'_, ()> {
    handle
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}
