use super::AsyncRunner;
use crate::context::{ExecutionContext, SerialExecutor};

use std::io;
use std::sync::Arc;
use std::time::Duration;

/// Default polling period of [`AsyncRunner::wait_until`].
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Builder for configuring and creating an [`AsyncRunner`].
///
/// # Examples
///
/// ```rust,ignore
/// let runner = RunnerBuilder::new()
///     .print_exceptions(false)
///     .auto_check(true)
///     .build();
/// ```
pub struct RunnerBuilder {
    /// Log failures when they are captured.
    print_exceptions: bool,

    /// Check the last-failure slot after every runner-level wait.
    auto_check: bool,

    /// Period between condition checks in `wait_until`.
    poll_interval: Duration,

    /// Name of the serial worker, when no context is injected.
    thread_name: String,

    /// Injected execution context.
    context: Option<Arc<dyn ExecutionContext>>,
}

impl RunnerBuilder {
    /// Creates a builder with the default configuration.
    ///
    /// Failures are printed, waits do not check the slot, and tasks run on
    /// a new [`SerialExecutor`].
    pub fn new() -> Self {
        Self {
            print_exceptions: true,
            auto_check: false,
            poll_interval: DEFAULT_POLL_INTERVAL,
            thread_name: String::from(crate::context::DEFAULT_THREAD_NAME),
            context: None,
        }
    }

    /// Sets whether captured failures are logged when captured.
    ///
    /// This never changes what `wait` or `check_last_exception` report.
    pub fn print_exceptions(mut self, enabled: bool) -> Self {
        self.print_exceptions = enabled;
        self
    }

    /// Sets whether [`AsyncRunner::wait`] and [`AsyncRunner::flush`] also
    /// check the last-failure slot once the wait succeeded.
    pub fn auto_check(mut self, enabled: bool) -> Self {
        self.auto_check = enabled;
        self
    }

    /// Sets the polling period of [`AsyncRunner::wait_until`].
    ///
    /// # Panics
    ///
    /// Panics if `interval` is zero.
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        assert!(!interval.is_zero(), "poll_interval must be > 0");

        self.poll_interval = interval;
        self
    }

    /// Sets the name of the serial worker thread.
    ///
    /// Ignored when a context is injected with [`context`](Self::context).
    pub fn thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }

    /// Runs tasks on `context` instead of a new [`SerialExecutor`].
    pub fn context(mut self, context: impl ExecutionContext + 'static) -> Self {
        self.context = Some(Arc::new(context));
        self
    }

    /// Builds the runner, starting the worker thread if needed.
    ///
    /// # Errors
    ///
    /// Fails if the worker thread cannot be spawned.
    pub fn try_build(self) -> io::Result<AsyncRunner> {
        let context: Arc<dyn ExecutionContext> = match self.context {
            Some(context) => context,
            None => Arc::new(SerialExecutor::with_name(self.thread_name)?),
        };

        Ok(AsyncRunner::from_parts(
            context,
            self.print_exceptions,
            self.auto_check,
            self.poll_interval,
        ))
    }

    /// Builds the runner.
    ///
    /// # Panics
    ///
    /// Panics if the worker thread cannot be spawned.
    pub fn build(self) -> AsyncRunner {
        self.try_build()
            .unwrap_or_else(|err| panic!("failed to start the serial worker: {err}"))
    }
}

impl Default for RunnerBuilder {
    /// Creates a default `RunnerBuilder`.
    fn default() -> Self {
        Self::new()
    }
}
