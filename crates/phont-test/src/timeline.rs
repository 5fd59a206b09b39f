//! Ordered record of events across several test doubles.

use parking_lot::Mutex;
use std::sync::Arc;

/// A shared, append-only list of event names.
///
/// Clones share the same list, so one timeline can be handed to a logger and
/// a status mapper to assert on the order in which they were called.
#[derive(Debug, Clone, Default)]
pub struct Timeline(Arc<Mutex<Vec<String>>>);

impl Timeline {
    /// Creates an empty timeline.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an event.
    pub fn record(&self, event: impl Into<String>) {
        self.0.lock().push(event.into());
    }

    /// Returns a copy of all events in order.
    #[must_use]
    pub fn events(&self) -> Vec<String> {
        self.0.lock().clone()
    }

    /// Returns the index of the first occurrence of `event`.
    #[must_use]
    pub fn position(&self, event: &str) -> Option<usize> {
        self.0.lock().iter().position(|recorded| recorded == event)
    }
}
