use super::Job;
use crate::utils::sync::lock;

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, PoisonError};

/// Shared handle to a job queue.
pub(crate) type QueueHandle = std::sync::Arc<JobQueue>;

/// FIFO queue feeding a serial worker.
///
/// The worker parks on the condition variable while the queue is empty.
/// The shutdown flag lives under the same lock as the jobs so that a
/// worker can never miss the final wake-up.
pub(crate) struct JobQueue {
    state: Mutex<QueueState>,
    available: Condvar,
}

struct QueueState {
    jobs: VecDeque<Job>,
    shutdown: bool,
}

impl JobQueue {
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(QueueState {
                jobs: VecDeque::new(),
                shutdown: false,
            }),
            available: Condvar::new(),
        }
    }

    /// Pushes a job and wakes the worker.
    ///
    /// Returns the job back if the queue has been shut down.
    pub(crate) fn push(&self, job: Job) -> Result<(), Job> {
        let mut state = lock(&self.state);

        if state.shutdown {
            return Err(job);
        }

        state.jobs.push_back(job);
        self.available.notify_one();
        Ok(())
    }

    /// Blocks until a job is available.
    ///
    /// After shutdown, the jobs already queued are still handed out; `None`
    /// is returned once the queue is both shut down and empty.
    pub(crate) fn next(&self) -> Option<Job> {
        let state = lock(&self.state);

        let mut state = self
            .available
            .wait_while(state, |s| s.jobs.is_empty() && !s.shutdown)
            .unwrap_or_else(PoisonError::into_inner);

        state.jobs.pop_front()
    }

    /// Stops accepting jobs and wakes the worker.
    pub(crate) fn shutdown(&self) {
        lock(&self.state).shutdown = true;
        self.available.notify_all();
    }

    pub(crate) fn len(&self) -> usize {
        lock(&self.state).jobs.len()
    }
}
