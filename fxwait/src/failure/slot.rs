use super::TaskFailure;
use crate::utils::sync::lock;

use std::sync::Mutex;

use tracing::debug;

/// Single-slot store for the most recent unchecked failure.
///
/// Holds nothing or exactly one failure. Storing over an unread failure
/// replaces it.
#[derive(Default)]
pub(crate) struct LastFailure {
    slot: Mutex<Option<TaskFailure>>,
}

impl LastFailure {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Stores `failure`, replacing any unread one.
    pub(crate) fn store(&self, failure: TaskFailure) {
        let previous = lock(&self.slot).replace(failure);

        if let Some(previous) = previous {
            debug!(failure = %previous, "unchecked failure overwritten by a newer one");
        }
    }

    /// Removes and returns the stored failure.
    pub(crate) fn take(&self) -> Option<TaskFailure> {
        lock(&self.slot).take()
    }

    pub(crate) fn clear(&self) {
        lock(&self.slot).take();
    }

    pub(crate) fn is_set(&self) -> bool {
        lock(&self.slot).is_some()
    }
}
