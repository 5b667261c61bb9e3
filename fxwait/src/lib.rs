//! # fxwait
//!
//! **fxwait** runs test code on a UI-like thread and keeps the failures it
//! raises until the test asks for them.
//!
//! GUI toolkits require widget work to happen on a single event thread. A
//! task that fails there has nobody to throw to, so fxwait captures the
//! failure instead: every [`Handle`] reports its own task's failure whenever
//! it is waited on, and the runner remembers the latest unchecked failure
//! until [`AsyncRunner::check_last_exception`] picks it up.
//!
//! It offers:
//!
//! - A **serial executor** running tasks one at a time, in submission order
//! - **Handles** with non-blocking polling, timed waits and `Future` support
//! - A **last-failure slot** with explicit check and clear
//! - **Injectable execution contexts**, including a hand-driven one for tests
//! - A `#[fxwait::test]` attribute checking the slot at the end of a test
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use fxwait::AsyncRunner;
//! use std::time::Duration;
//!
//! let runner = AsyncRunner::builder().print_exceptions(false).build();
//!
//! let handle = runner.execute(|| -> u32 { unimplemented!() });
//! assert!(handle.wait(Duration::from_secs(1)).is_err());
//!
//! let failure = runner.check_last_exception().unwrap_err();
//! assert!(failure.panic_message().is_some());
//! ```
//!
//! ## Modules
//!
//! - [`wait`] — Condition polling with a timeout

mod context;
mod failure;
mod runner;
mod task;
mod utils;

pub mod wait;

pub use context::{ExecutionContext, Job, ManualExecutor, SerialExecutor, on_worker_thread};
pub use failure::{BoxError, FailureOrigin, PanicError, TaskFailure, WaitError};
pub use runner::{AsyncRunner, RunnerBuilder};
pub use task::Handle;

pub use fxwait_macros::test;
