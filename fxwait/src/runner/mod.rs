//! The asynchronous runner.
//!
//! [`AsyncRunner`] submits work to a serial execution context (the UI
//! thread), hands back a [`Handle`] per task, and keeps the most recent
//! unchecked failure until [`check_last_exception`](AsyncRunner::check_last_exception)
//! or [`clear_exceptions`](AsyncRunner::clear_exceptions) is called.

mod builder;
mod shared;

pub use builder::RunnerBuilder;
pub(crate) use shared::Shared;

use crate::context::ExecutionContext;
use crate::failure::{BoxError, FailureOrigin, TaskFailure, WaitError};
use crate::task::{self, Completion, Handle};
use crate::wait;

use std::fmt;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing::warn;

/// Name given to threads started by [`AsyncRunner::submit_background`].
const BACKGROUND_THREAD_NAME: &str = "fxwait-background";

/// Runs tasks on a serial context and defers their failures.
///
/// A failing task never throws on the context. Its failure is stored twice:
/// in the task's [`Handle`], reported by every wait on it, and in the
/// runner's last-failure slot, reported once by
/// [`check_last_exception`](Self::check_last_exception). The two are
/// independent. Only the latest unchecked failure is kept.
///
/// Dropping the runner drops its context. With the default
/// [`SerialExecutor`](crate::SerialExecutor) this runs the queued tasks and
/// joins the worker.
///
/// # Examples
///
/// ```rust,ignore
/// let runner = AsyncRunner::builder().print_exceptions(false).build();
///
/// let handle = runner.submit(|| Err::<(), _>(Unsupported));
/// assert!(runner.wait(&handle, Duration::from_secs(1)).is_err());
///
/// assert!(runner.check_last_exception().is_err());
/// assert!(runner.check_last_exception().is_ok());
/// ```
pub struct AsyncRunner {
    /// The serial context tasks run on.
    context: Arc<dyn ExecutionContext>,

    /// Last-failure slot and logging switch.
    shared: Arc<Shared>,

    /// Check the slot after every successful runner-level wait.
    auto_check: bool,

    /// Polling period of `wait_until`.
    poll_interval: Duration,
}

impl AsyncRunner {
    /// Creates a runner with the default configuration.
    ///
    /// # Panics
    ///
    /// Panics if the worker thread cannot be spawned.
    pub fn new() -> Self {
        RunnerBuilder::new().build()
    }

    /// Returns a builder for configuring a runner.
    pub fn builder() -> RunnerBuilder {
        RunnerBuilder::new()
    }

    pub(crate) fn from_parts(
        context: Arc<dyn ExecutionContext>,
        print_exceptions: bool,
        auto_check: bool,
        poll_interval: Duration,
    ) -> Self {
        Self {
            context,
            shared: Arc::new(Shared::new(print_exceptions)),
            auto_check,
            poll_interval,
        }
    }

    /// Submits the fallible task `f` to the context.
    ///
    /// Returns immediately with a pending handle. The task should not block
    /// indefinitely: nothing bounds its execution time.
    pub fn submit<F, T, E>(&self, f: F) -> Handle<T>
    where
        F: FnOnce() -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: Into<BoxError>,
    {
        let completion = Arc::new(Completion::new());
        let job = task::job(
            move || f().map_err(Into::into),
            completion.clone(),
            self.shared.clone(),
        );

        self.context.execute(job);
        Handle::new(completion)
    }

    /// Submits an infallible task to the context.
    ///
    /// A panic in `f` is captured like an error.
    pub fn execute<F, T>(&self, f: F) -> Handle<T>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        self.submit(move || Ok::<T, BoxError>(f()))
    }

    /// Runs the fallible task `f` on a new background thread instead of
    /// the context.
    ///
    /// Failures are captured exactly as for [`submit`](Self::submit). If the
    /// thread cannot be spawned, that error becomes the task's failure.
    pub fn submit_background<F, T, E>(&self, f: F) -> Handle<T>
    where
        F: FnOnce() -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: Into<BoxError>,
    {
        let completion = Arc::new(Completion::new());
        let job = task::job(
            move || f().map_err(Into::into),
            completion.clone(),
            self.shared.clone(),
        );

        let spawned = thread::Builder::new()
            .name(BACKGROUND_THREAD_NAME.to_owned())
            .spawn(job);

        if let Err(err) = spawned {
            warn!(error = %err, "failed to spawn background task thread");

            let failure = TaskFailure::capture(err, FailureOrigin::Error);
            self.shared.record(failure.clone());
            completion.resolve(Err(failure));
        }

        Handle::new(completion)
    }

    /// Waits for `handle` to resolve, at most `timeout`.
    ///
    /// Same as [`Handle::wait`], except that with `auto_check` enabled a
    /// pending failure in the slot is reported once the wait succeeded.
    pub fn wait<T: Clone>(&self, handle: &Handle<T>, timeout: Duration) -> Result<T, WaitError> {
        let value = handle.wait(timeout)?;

        if self.auto_check {
            self.check_last_exception()?;
        }

        Ok(value)
    }

    /// Waits until every task submitted before this call has run.
    ///
    /// Works by queueing an empty task behind them and waiting for it.
    pub fn flush(&self, timeout: Duration) -> Result<(), WaitError> {
        let marker = self.execute(|| ());
        self.wait(&marker, timeout)
    }

    /// Polls `condition` every poll interval until it holds or `timeout`
    /// elapses. The condition runs on the calling thread.
    pub fn wait_until<F>(&self, timeout: Duration, condition: F) -> Result<(), WaitError>
    where
        F: FnMut() -> bool,
    {
        wait::wait_until(timeout, self.poll_interval, condition)
    }

    /// Reports the most recent unchecked failure, clearing it.
    ///
    /// Returns `Ok(())` when no failure is pending.
    pub fn check_last_exception(&self) -> Result<(), TaskFailure> {
        match self.shared.last_failure.take() {
            Some(failure) => Err(failure),
            None => Ok(()),
        }
    }

    /// Discards any unchecked failure.
    pub fn clear_exceptions(&self) {
        self.shared.last_failure.clear();
    }

    /// Returns `true` if a failure is waiting to be checked.
    pub fn has_unchecked_failure(&self) -> bool {
        self.shared.last_failure.is_set()
    }

    /// Whether failures are logged when captured.
    pub fn print_exceptions(&self) -> bool {
        self.shared.print_exceptions()
    }

    /// Turns capture-time logging on or off.
    ///
    /// Tasks already running read the new value when they fail.
    pub fn set_print_exceptions(&self, enabled: bool) {
        self.shared.set_print_exceptions(enabled);
    }
}

impl Default for AsyncRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AsyncRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncRunner")
            .field("print_exceptions", &self.print_exceptions())
            .field("auto_check", &self.auto_check)
            .field("poll_interval", &self.poll_interval)
            .field("unchecked_failure", &self.has_unchecked_failure())
            .finish_non_exhaustive()
    }
}
