/// The task has not finished yet.
pub(crate) const PENDING: usize = 0;

/// The task produced a value.
pub(crate) const SUCCEEDED: usize = 1;

/// The task returned an error or panicked.
///
/// Like `SUCCEEDED`, this state is terminal.
pub(crate) const FAILED: usize = 2;
