//! Condition polling.

use crate::failure::WaitError;

use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

/// Polls `condition` every `interval` until it returns `true`.
///
/// The condition is checked once right away, then after each interval, and
/// a last time when the deadline is reached.
///
/// # Errors
///
/// Returns [`WaitError::Timeout`] if the condition still fails after
/// `timeout`.
///
/// # Panics
///
/// Panics if `interval` is zero.
///
/// # Examples
///
/// ```rust,ignore
/// let ready = Arc::new(AtomicBool::new(false));
/// // ... hand `ready` to a task ...
/// wait_until(Duration::from_secs(1), Duration::from_millis(5), || {
///     ready.load(Ordering::Acquire)
/// })?;
/// ```
pub fn wait_until<F>(timeout: Duration, interval: Duration, mut condition: F) -> Result<(), WaitError>
where
    F: FnMut() -> bool,
{
    assert!(!interval.is_zero(), "interval must be > 0");

    // `None` if the deadline is too far away to represent: wait forever.
    let deadline = Instant::now().checked_add(timeout);

    loop {
        if condition() {
            return Ok(());
        }

        let now = Instant::now();
        let nap = match deadline {
            Some(deadline) if now >= deadline => {
                debug!(?timeout, "condition still false at deadline");
                return Err(WaitError::Timeout(timeout));
            }
            Some(deadline) => interval.min(deadline - now),
            None => interval,
        };

        thread::sleep(nap);
    }
}
