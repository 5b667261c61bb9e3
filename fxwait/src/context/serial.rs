use super::queue::{JobQueue, QueueHandle};
use super::{ExecutionContext, Job, current};

use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::{self, JoinHandle};

use tracing::{debug, error, trace};

/// Source of executor identifiers.
static NEXT_ID: AtomicUsize = AtomicUsize::new(0);

/// Default name of the worker thread.
pub(crate) const DEFAULT_THREAD_NAME: &str = "fxwait-worker";

/// Execution context backed by one dedicated worker thread.
///
/// Jobs run strictly in submission order, one at a time, mirroring a GUI
/// toolkit's event thread. Submission is safe from any number of threads.
///
/// Dropping the executor stops accepting jobs, lets the worker finish the
/// jobs already queued and joins it.
pub struct SerialExecutor {
    /// Identifier reported by [`is_worker_thread`](Self::is_worker_thread).
    id: usize,

    /// Queue shared with the worker.
    queue: QueueHandle,

    /// Join handle for the worker thread.
    worker: Option<JoinHandle<()>>,
}

impl SerialExecutor {
    /// Starts an executor whose worker is named `fxwait-worker`.
    pub fn new() -> io::Result<Self> {
        Self::with_name(DEFAULT_THREAD_NAME)
    }

    /// Starts an executor whose worker thread is called `name`.
    ///
    /// # Errors
    ///
    /// Returns the error reported by the OS if the thread cannot be spawned.
    pub fn with_name(name: impl Into<String>) -> io::Result<Self> {
        let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
        let queue = Arc::new(JobQueue::new());

        let worker_queue = queue.clone();
        let worker = thread::Builder::new()
            .name(name.into())
            .spawn(move || run_worker(id, worker_queue))?;

        Ok(Self {
            id,
            queue,
            worker: Some(worker),
        })
    }

    /// Returns `true` when called from this executor's worker thread.
    pub fn is_worker_thread(&self) -> bool {
        current::current() == Some(self.id)
    }

    /// Number of jobs waiting to run.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

impl ExecutionContext for SerialExecutor {
    fn execute(&self, job: Job) {
        // The queue only shuts down in `drop`, which needs exclusive access.
        if self.queue.push(job).is_err() {
            debug!(executor = self.id, "job rejected by a stopped executor");
        }
    }
}

impl Drop for SerialExecutor {
    /// Shuts the executor down.
    ///
    /// 1. Stops job submission and wakes the worker
    /// 2. Lets the worker drain the queue
    /// 3. Joins the worker, unless dropped from the worker itself
    fn drop(&mut self) {
        self.queue.shutdown();

        if let Some(worker) = self.worker.take() {
            if worker.thread().id() != thread::current().id() {
                let _ = worker.join();
            }
        }
    }
}

impl std::fmt::Debug for SerialExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialExecutor")
            .field("id", &self.id)
            .field("pending", &self.pending())
            .finish()
    }
}

/// Worker loop: runs jobs until the queue is shut down and drained.
///
/// A panicking job is logged and does not take the worker down.
fn run_worker(id: usize, queue: Arc<JobQueue>) {
    current::enter(id);
    debug!(executor = id, "serial worker started");

    while let Some(job) = queue.next() {
        trace!(executor = id, "running job");

        if panic::catch_unwind(AssertUnwindSafe(job)).is_err() {
            error!(executor = id, "job panicked on the serial worker");
        }
    }

    debug!(executor = id, "serial worker stopped");
}
