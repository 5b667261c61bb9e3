use super::completion::{Completion, Outcome};
use super::state::{FAILED, PENDING};
use crate::failure::{TaskFailure, WaitError};

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use tracing::debug;

/// A handle to a submitted task.
///
/// The handle resolves exactly once, either with the task's value or with
/// the [`TaskFailure`] it raised. Waiting is repeatable: a failed handle
/// reports its failure on every wait, whatever happened to the runner's
/// last-failure slot in between.
///
/// Dropping the handle does **not** cancel the task.
///
/// # Examples
///
/// ```rust,ignore
/// let handle = runner.execute(|| 40 + 2);
/// assert_eq!(handle.wait(Duration::from_secs(1))?, 42);
/// ```
pub struct Handle<T> {
    completion: Arc<Completion<T>>,
}

impl<T> Handle<T> {
    pub(crate) fn new(completion: Arc<Completion<T>>) -> Self {
        Self { completion }
    }

    /// Returns `true` once the task has finished, successfully or not.
    pub fn is_done(&self) -> bool {
        self.completion.state() != PENDING
    }

    /// Returns `true` if the task finished with a failure.
    pub fn is_failed(&self) -> bool {
        self.completion.state() == FAILED
    }

    /// Blocks until the task finishes and returns its outcome.
    ///
    /// There is no timeout: prefer [`wait`](Self::wait) unless the task is
    /// known to finish.
    pub fn join(self) -> Result<T, TaskFailure> {
        let mut outcome = self.completion.wait();

        // The handle is the only reader, and `join` consumes it.
        match outcome.take() {
            Some(outcome) => outcome,
            None => unreachable!("completion woke without an outcome"),
        }
    }
}

impl<T: Clone> Handle<T> {
    /// Blocks until the task finishes or `timeout` elapses.
    ///
    /// A timeout leaves the task untouched: it may still finish (or fail)
    /// later, and a later wait observes that.
    pub fn wait(&self, timeout: Duration) -> Result<T, WaitError> {
        match self.completion.wait_timeout(timeout) {
            Some(outcome) => Ok(cloned(outcome.as_ref())?),
            None => {
                debug!(?timeout, "wait on task timed out");
                Err(WaitError::Timeout(timeout))
            }
        }
    }

    /// Returns the outcome if the task has finished, without blocking.
    pub fn try_outcome(&self) -> Option<Result<T, TaskFailure>> {
        self.completion.peek().as_ref().map(|o| cloned(Some(o)))
    }
}

fn cloned<T: Clone>(outcome: Option<&Outcome<T>>) -> Outcome<T> {
    match outcome {
        Some(Ok(value)) => Ok(value.clone()),
        Some(Err(failure)) => Err(failure.clone()),
        None => unreachable!("resolved completion without an outcome"),
    }
}

impl<T: Clone> Future for Handle<T> {
    /// The value or the failure of the task.
    type Output = Result<T, TaskFailure>;

    /// Polls the handle.
    ///
    /// The waker is registered **before** re-checking the outcome to avoid
    /// missed wake-ups.
    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        if let Some(outcome) = self.try_outcome() {
            return Poll::Ready(outcome);
        }

        self.completion.register(cx.waker());

        match self.try_outcome() {
            Some(outcome) => Poll::Ready(outcome),
            None => Poll::Pending,
        }
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("done", &self.is_done())
            .field("failed", &self.is_failed())
            .finish()
    }
}
