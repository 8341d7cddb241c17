//! Browser-history seam.
//!
//! The filter manager records each settled state as a history entry so the
//! back button restores earlier table views.

use std::sync::{Mutex, PoisonError};

use super::state::FilterState;

/// A history entry. `search` is the query string without the leading `?`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    pub pathname: String,
    pub search: String,
    pub state: Option<FilterState>,
}

pub trait History: Send + Sync {
    /// The current entry.
    fn location(&self) -> Location;

    /// Add an entry after the current one, dropping any forward entries.
    fn push(&self, location: Location);

    /// Overwrite the current entry.
    fn replace(&self, location: Location);
}

/// In-process [`History`] used by headless tables and tests.
#[derive(Debug)]
pub struct MemoryHistory {
    inner: Mutex<Entries>,
}

#[derive(Debug)]
struct Entries {
    stack: Vec<Location>,
    index: usize,
}

impl MemoryHistory {
    pub fn new(initial: Location) -> Self {
        Self {
            inner: Mutex::new(Entries {
                stack: vec![initial],
                index: 0,
            }),
        }
    }

    /// Start at `pathname?search` with no attached state.
    pub fn at(pathname: &str, search: &str) -> Self {
        Self::new(Location {
            pathname: pathname.to_string(),
            search: search.trim_start_matches('?').to_string(),
            state: None,
        })
    }

    /// Every entry, oldest first.
    pub fn entries(&self) -> Vec<Location> {
        self.lock().stack.clone()
    }

    /// Step back one entry. Returns `false` at the oldest entry.
    pub fn back(&self) -> bool {
        let mut entries = self.lock();
        if entries.index == 0 {
            return false;
        }
        entries.index -= 1;
        true
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Entries> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl History for MemoryHistory {
    fn location(&self) -> Location {
        let entries = self.lock();
        entries.stack[entries.index].clone()
    }

    fn push(&self, location: Location) {
        let mut entries = self.lock();
        let keep = entries.index + 1;
        entries.stack.truncate(keep);
        entries.stack.push(location);
        entries.index = keep;
    }

    fn replace(&self, location: Location) {
        let mut entries = self.lock();
        let index = entries.index;
        entries.stack[index] = location;
    }
}
