//! Debug category gate
//!
//! `-debug=<category>` (repeatable) enables categorized log output; a bare
//! `-debug` or `-debug=1` enables everything. Each thread copies the
//! category set out of the store the first time it asks and keeps that copy
//! for the rest of its life. Later changes to `-debug` are not seen by that
//! thread. In exchange, the check takes no shared lock after the first call
//! and still works from thread-exit paths.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::settings::{ArgumentStore, DEBUG_KEY};

thread_local! {
    // Keyed by store id so several stores in one process stay apart.
    static SNAPSHOTS: RefCell<HashMap<u64, HashSet<String>>> = RefCell::new(HashMap::new());
}

/// Per-thread cached predicate over the `-debug` categories
#[derive(Debug)]
pub struct CategoryFilter {
    store: Arc<ArgumentStore>,
    debug: AtomicBool,
}

impl CategoryFilter {
    pub fn new(store: Arc<ArgumentStore>, debug: bool) -> Self {
        Self {
            store,
            debug: AtomicBool::new(debug),
        }
    }

    pub fn debug_enabled(&self) -> bool {
        self.debug.load(Ordering::Relaxed)
    }

    pub fn set_debug(&self, debug: bool) {
        self.debug.store(debug, Ordering::Relaxed);
    }

    /// Whether a message tagged with `category` should be logged
    ///
    /// Uncategorized messages always pass. With debug mode off, every
    /// categorized message is dropped.
    pub fn allowed(&self, category: Option<&str>) -> bool {
        let Some(category) = category else {
            return true;
        };
        if !self.debug_enabled() {
            return false;
        }

        let id = self.store.id();
        let cached = SNAPSHOTS.try_with(|snapshots| {
            let mut snapshots = snapshots.borrow_mut();
            let set = snapshots.entry(id).or_insert_with(|| self.snapshot());
            accepts(set, category)
        });

        // Thread-local storage is gone once the thread is exiting.
        cached.unwrap_or_else(|_| accepts(&self.snapshot(), category))
    }

    fn snapshot(&self) -> HashSet<String> {
        self.store.get_multi(DEBUG_KEY).into_iter().collect()
    }
}

fn accepts(categories: &HashSet<String>, category: &str) -> bool {
    categories.contains("") || categories.contains("1") || categories.contains(category)
}
