//! Test fixtures shared by listener tests.

use std::sync::{Arc, Mutex};

use thiserror::Error;

/// Error returned by deliberately failing test listeners.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("test failure: {label}")]
pub struct TestFailure {
    /// Which listener failed.
    pub label: String,
}

impl TestFailure {
    /// Create a failure tagged with `label`.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

/// Append-only log that listeners write to, in call order.
///
/// Clones share the same log, so one clone can be moved into each listener.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    entries: Arc<Mutex<Vec<String>>>,
}

impl CallLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn record(&self, entry: impl Into<String>) {
        self.entries
            .lock()
            .expect("lock poisoned")
            .push(entry.into());
    }

    /// All entries so far, oldest first.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().expect("lock poisoned").clone()
    }

    /// Number of entries so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().expect("lock poisoned").len()
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// How many entries equal `entry`.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn count(&self, entry: &str) -> usize {
        self.entries
            .lock()
            .expect("lock poisoned")
            .iter()
            .filter(|e| e.as_str() == entry)
            .count()
    }
}
