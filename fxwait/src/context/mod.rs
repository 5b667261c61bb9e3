//! Execution contexts.
//!
//! An [`ExecutionContext`] stands in for a GUI toolkit's event thread: it
//! accepts jobs and runs them one at a time, in order. The runner does not
//! care how, only that every job eventually runs.
//!
//! Two contexts are provided:
//! - [`SerialExecutor`]: a dedicated worker thread, used by default,
//! - [`ManualExecutor`]: a queue drained explicitly by the test.

mod current;
mod manual;
mod queue;
mod serial;

pub use current::on_worker_thread;
pub use manual::ManualExecutor;
pub use serial::SerialExecutor;

pub(crate) use serial::DEFAULT_THREAD_NAME;

/// A unit of work handed to an execution context.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// A single-threaded context that runs jobs serially.
///
/// Implementations must run jobs in the order they were handed over and
/// never run two jobs at once.
pub trait ExecutionContext: Send + Sync {
    /// Schedules `job` to run on the context.
    fn execute(&self, job: Job);
}
