use std::cell::Cell;

thread_local! {
    /// Identifier of the serial executor owning the current thread.
    ///
    /// Set once by the worker loop, `None` on every other thread.
    pub(crate) static CURRENT_EXECUTOR: Cell<Option<usize>> = const { Cell::new(None) };
}

/// Marks the current thread as the worker of executor `id`.
pub(crate) fn enter(id: usize) {
    CURRENT_EXECUTOR.with(|current| current.set(Some(id)));
}

/// Identifier of the executor owning the current thread, if any.
pub(crate) fn current() -> Option<usize> {
    CURRENT_EXECUTOR.with(Cell::get)
}

/// Returns `true` when called from a [`SerialExecutor`](super::SerialExecutor)
/// worker thread.
///
/// This is the equivalent of asking whether code runs on the UI thread.
pub fn on_worker_thread() -> bool {
    current().is_some()
}
