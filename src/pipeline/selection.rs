//! Selection state: the current-date cell
//!
//! A single mutable value scoped to the consuming session. Last write wins,
//! there is no history, and updating it is the sole trigger for re-querying
//! besides store mutation. The session samples it at switch time; nothing
//! subscribes to it directly, so a plain lock suffices.

use chrono::NaiveDate;
use parking_lot::Mutex;

/// The currently selected date, sampled and last-write-wins
#[derive(Debug, Default)]
pub struct SelectionState {
    current: Mutex<Option<NaiveDate>>,
}

impl SelectionState {
    /// Create with no date selected
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the selected date
    pub fn select(&self, date: NaiveDate) {
        *self.current.lock() = Some(date);
    }

    /// Atomically read the current selection
    pub fn current(&self) -> Option<NaiveDate> {
        *self.current.lock()
    }
}
