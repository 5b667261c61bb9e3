//! Failure types.
//!
//! A task that fails on an execution context has no caller to report to, so
//! its error is wrapped in a [`TaskFailure`] and handed back later, either
//! through the task's [`Handle`](crate::Handle) or through the runner's
//! last-failure slot.

mod slot;

pub(crate) use slot::LastFailure;

use std::any::Any;
use std::error::Error;
use std::fmt;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Boxed error accepted from fallible tasks.
pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// How a task failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureOrigin {
    /// The task returned `Err`.
    Error,

    /// The task panicked.
    Panic,
}

/// A failure captured from a task that ran asynchronously.
///
/// Cloning is cheap: the original error is shared, so the same failure can
/// live in a [`Handle`](crate::Handle) and in the last-failure slot at once.
/// [`source`](Error::source) returns the original error.
#[derive(Clone)]
pub struct TaskFailure {
    cause: Arc<dyn Error + Send + Sync + 'static>,
    origin: FailureOrigin,
    thread: String,
}

impl TaskFailure {
    /// Wraps `cause`, recording the current thread as the place it happened.
    pub(crate) fn capture(cause: impl Into<BoxError>, origin: FailureOrigin) -> Self {
        let thread = thread::current()
            .name()
            .unwrap_or("<unnamed>")
            .to_owned();

        Self {
            cause: Arc::from(cause.into()),
            origin,
            thread,
        }
    }

    /// The error raised by the task.
    pub fn cause(&self) -> &(dyn Error + Send + Sync + 'static) {
        &*self.cause
    }

    /// Whether the task returned an error or panicked.
    pub fn origin(&self) -> FailureOrigin {
        self.origin
    }

    /// Name of the thread the task failed on.
    pub fn thread(&self) -> &str {
        &self.thread
    }

    /// Returns `true` if the cause is of type `E`.
    pub fn is<E: Error + 'static>(&self) -> bool {
        self.cause.is::<E>()
    }

    /// Returns the cause as `E`, if it is one.
    pub fn downcast_ref<E: Error + 'static>(&self) -> Option<&E> {
        self.cause.downcast_ref::<E>()
    }

    /// The panic message, if the task panicked.
    pub fn panic_message(&self) -> Option<&str> {
        self.downcast_ref::<PanicError>().map(PanicError::message)
    }
}

impl fmt::Debug for TaskFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskFailure")
            .field("cause", &self.cause)
            .field("origin", &self.origin)
            .field("thread", &self.thread)
            .finish()
    }
}

impl fmt::Display for TaskFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "asynchronous task failed on thread `{}`: {}",
            self.thread, self.cause
        )
    }
}

impl Error for TaskFailure {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&*self.cause)
    }
}

/// Cause recorded when a task panics.
#[derive(Debug, Clone, thiserror::Error)]
#[error("task panicked: {message}")]
pub struct PanicError {
    message: String,
}

impl PanicError {
    /// Builds the error from a payload returned by `catch_unwind`.
    pub(crate) fn from_payload(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&'static str>() {
            (*s).to_owned()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            String::from("Box<dyn Any>")
        };

        Self { message }
    }

    /// The message passed to `panic!`.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Error returned when waiting on a task.
#[derive(Debug, Clone, thiserror::Error)]
pub enum WaitError {
    /// The wait gave up before the task resolved. The task keeps running.
    #[error("timed out after {0:?} waiting for the task")]
    Timeout(Duration),

    /// The task failed.
    #[error(transparent)]
    Failed(#[from] TaskFailure),
}

impl WaitError {
    /// Returns `true` for [`WaitError::Timeout`].
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }

    /// The task failure, if the task failed.
    pub fn failure(&self) -> Option<&TaskFailure> {
        match self {
            Self::Failed(failure) => Some(failure),
            Self::Timeout(_) => None,
        }
    }
}
