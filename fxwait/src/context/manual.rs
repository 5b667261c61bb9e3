use super::{ExecutionContext, Job};
use crate::utils::sync::lock;

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Execution context driven by hand.
///
/// Jobs are queued and only run when [`run_next`](Self::run_next) or
/// [`run_pending`](Self::run_pending) is called, on the calling thread.
/// Clones share the same queue, so a test can keep one clone and give the
/// other to a runner.
///
/// # Examples
///
/// ```rust,ignore
/// let ui = ManualExecutor::new();
/// let runner = AsyncRunner::builder().context(ui.clone()).build();
///
/// let handle = runner.execute(|| 1);
/// assert!(!handle.is_done());
///
/// ui.run_pending();
/// assert!(handle.is_done());
/// ```
#[derive(Clone, Default)]
pub struct ManualExecutor {
    queue: Arc<Mutex<VecDeque<Job>>>,
}

impl ManualExecutor {
    /// Creates an executor with an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of queued jobs.
    pub fn pending(&self) -> usize {
        lock(&self.queue).len()
    }

    /// Runs the oldest queued job. Returns `false` if there was none.
    pub fn run_next(&self) -> bool {
        // Released before running: the job may submit more work.
        let job = lock(&self.queue).pop_front();

        match job {
            Some(job) => {
                job();
                true
            }
            None => false,
        }
    }

    /// Runs jobs until the queue is empty, including jobs queued meanwhile.
    ///
    /// Returns how many jobs ran.
    pub fn run_pending(&self) -> usize {
        let mut ran = 0;
        while self.run_next() {
            ran += 1;
        }
        ran
    }
}

impl ExecutionContext for ManualExecutor {
    fn execute(&self, job: Job) {
        lock(&self.queue).push_back(job);
    }
}

impl std::fmt::Debug for ManualExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManualExecutor")
            .field("pending", &self.pending())
            .finish()
    }
}
