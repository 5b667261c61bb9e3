//! Task primitives.
//!
//! A submitted closure is wrapped into a [`Job`](crate::Job) that runs it,
//! captures any error or panic, records the failure with the runner and
//! resolves the shared completion the [`Handle`] observes.

pub(crate) mod completion;
pub(crate) mod handle;
pub(crate) mod state;

pub(crate) use completion::{Completion, job};
pub use handle::Handle;
