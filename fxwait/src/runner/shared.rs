use crate::failure::{LastFailure, TaskFailure};

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::error;

/// State shared between a runner and the jobs it created.
///
/// Lives as long as the runner or any of its in-flight jobs.
pub(crate) struct Shared {
    /// Most recent unchecked failure.
    pub(crate) last_failure: LastFailure,

    /// Whether captured failures are logged at capture time.
    print_exceptions: AtomicBool,
}

impl Shared {
    pub(crate) fn new(print_exceptions: bool) -> Self {
        Self {
            last_failure: LastFailure::new(),
            print_exceptions: AtomicBool::new(print_exceptions),
        }
    }

    /// Records a failure captured from a task.
    pub(crate) fn record(&self, failure: TaskFailure) {
        if self.print_exceptions() {
            error!(
                origin = ?failure.origin(),
                thread = failure.thread(),
                "asynchronous task failed: {}",
                failure.cause()
            );
        }

        self.last_failure.store(failure);
    }

    pub(crate) fn print_exceptions(&self) -> bool {
        self.print_exceptions.load(Ordering::Acquire)
    }

    pub(crate) fn set_print_exceptions(&self, enabled: bool) {
        self.print_exceptions.store(enabled, Ordering::Release);
    }
}
