use super::state::{FAILED, PENDING, SUCCEEDED};
use crate::context::Job;
use crate::failure::{BoxError, FailureOrigin, PanicError, TaskFailure};
use crate::runner::Shared;
use crate::utils::sync::lock;

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::task::Waker;
use std::time::Duration;

/// Outcome of a finished task.
pub(crate) type Outcome<T> = Result<T, TaskFailure>;

/// Shared completion state between a job and its [`Handle`](super::Handle).
///
/// The completion is resolved exactly once. Blocking waiters park on the
/// condition variable, async waiters register a [`Waker`].
pub(crate) struct Completion<T> {
    /// `PENDING`, `SUCCEEDED` or `FAILED`.
    state: AtomicUsize,

    /// The outcome, `None` until resolved.
    outcome: Mutex<Option<Outcome<T>>>,

    /// Signalled once the outcome is stored.
    resolved: Condvar,

    /// Wakers of futures polling the handle.
    waiters: Mutex<Vec<Waker>>,
}

impl<T> Completion<T> {
    pub(crate) fn new() -> Self {
        Self {
            state: AtomicUsize::new(PENDING),
            outcome: Mutex::new(None),
            resolved: Condvar::new(),
            waiters: Mutex::new(Vec::new()),
        }
    }

    /// Stores the outcome and wakes every waiter.
    ///
    /// Later calls are ignored.
    pub(crate) fn resolve(&self, outcome: Outcome<T>) {
        let state = if outcome.is_ok() { SUCCEEDED } else { FAILED };

        {
            let mut slot = lock(&self.outcome);
            if slot.is_some() {
                return;
            }

            *slot = Some(outcome);
            self.state.store(state, Ordering::Release);
            self.resolved.notify_all();
        }

        let waiters = std::mem::take(&mut *lock(&self.waiters));
        for waker in waiters {
            waker.wake();
        }
    }

    pub(crate) fn state(&self) -> usize {
        self.state.load(Ordering::Acquire)
    }

    /// Blocks until resolved or `timeout` elapses.
    ///
    /// Returns the locked outcome, or `None` on timeout.
    pub(crate) fn wait_timeout(
        &self,
        timeout: Duration,
    ) -> Option<MutexGuard<'_, Option<Outcome<T>>>> {
        let guard = lock(&self.outcome);

        let (guard, _) = self
            .resolved
            .wait_timeout_while(guard, timeout, |outcome| outcome.is_none())
            .unwrap_or_else(PoisonError::into_inner);

        guard.is_some().then_some(guard)
    }

    /// Blocks until resolved and returns the locked outcome.
    pub(crate) fn wait(&self) -> MutexGuard<'_, Option<Outcome<T>>> {
        let guard = lock(&self.outcome);

        self.resolved
            .wait_while(guard, |outcome| outcome.is_none())
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the locked outcome without blocking.
    pub(crate) fn peek(&self) -> MutexGuard<'_, Option<Outcome<T>>> {
        lock(&self.outcome)
    }

    pub(crate) fn register(&self, waker: &Waker) {
        let mut waiters = lock(&self.waiters);

        if !waiters.iter().any(|w| w.will_wake(waker)) {
            waiters.push(waker.clone());
        }
    }
}

/// Wraps `task` into a job for an execution context.
///
/// The job runs the task, turns an error or a panic into a [`TaskFailure`],
/// records the failure with `shared` and then resolves `completion`. A
/// failure is therefore already in the last-failure slot by the time the
/// handle reports it.
pub(crate) fn job<F, T>(task: F, completion: Arc<Completion<T>>, shared: Arc<Shared>) -> Job
where
    F: FnOnce() -> Result<T, BoxError> + Send + 'static,
    T: Send + 'static,
{
    Box::new(move || {
        let outcome = match panic::catch_unwind(AssertUnwindSafe(task)) {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(error)) => Err(TaskFailure::capture(error, FailureOrigin::Error)),
            Err(payload) => Err(TaskFailure::capture(
                PanicError::from_payload(payload),
                FailureOrigin::Panic,
            )),
        };

        if let Err(failure) = &outcome {
            shared.record(failure.clone());
        }

        completion.resolve(outcome);
    })
}
