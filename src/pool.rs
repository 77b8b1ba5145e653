//! Thread pool: submission, drain, and shutdown.
//!
//! The pool owns a fixed set of (worker thread, task queue) pairs for
//! its whole lifetime. Submission distributes tasks round-robin across
//! the queues, or to an explicit queue index when a caller wants to
//! force imbalance; idle workers rebalance the load by stealing.

#[cfg(feature = "metrics")]
use crate::metrics::{Metrics, MetricsSnapshot};
use crate::counter::Counter;
use crate::queue::TaskQueue;
use crate::task::Task;
use crate::worker::Worker;
use crate::PinningStrategy;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

/// Configuration for the thread pool.
#[derive(Clone, Debug, Default)]
pub struct PoolConfig {
    /// How worker threads are placed on CPU cores. Default: no pinning.
    pub pinning: PinningStrategy,
}

/// State shared between the pool handle and its workers.
pub(crate) struct Shared {
    pub(crate) queues: Vec<TaskQueue>,
    pub(crate) running: AtomicBool,
    pub(crate) pending: Counter,
    #[cfg(feature = "metrics")]
    pub(crate) metrics: Metrics,
}

/// A work-stealing thread pool with a fixed number of workers.
///
/// Dropping the pool signals shutdown and joins every worker; tasks
/// still queued at that point are executed before the workers exit.
pub struct ThreadPool {
    shared: Arc<Shared>,
    next_queue: AtomicUsize,
    workers: Vec<Worker>,
}

impl ThreadPool {
    /// Creates a new pool with the specified number of worker threads.
    ///
    /// # Panics
    ///
    /// Panics if `worker_count` is zero.
    ///
    /// # Example
    ///
    /// ```
    /// use taskpool::ThreadPool;
    ///
    /// let pool = ThreadPool::new(4);
    /// assert_eq!(pool.num_workers(), 4);
    /// ```
    pub fn new(worker_count: usize) -> Self {
        Self::with_config(worker_count, PoolConfig::default())
    }

    /// Creates a new pool with custom configuration.
    pub fn with_config(worker_count: usize, config: PoolConfig) -> Self {
        assert!(worker_count >= 1, "pool needs at least one worker");

        let shared = Arc::new(Shared {
            queues: (0..worker_count).map(|_| TaskQueue::new()).collect(),
            running: AtomicBool::new(true),
            pending: Counter::new(0),
            #[cfg(feature = "metrics")]
            metrics: Metrics::new(),
        });

        let workers = (0..worker_count)
            .map(|id| Worker::new(id, Arc::clone(&shared), config.pinning))
            .collect();

        ThreadPool {
            shared,
            next_queue: AtomicUsize::new(0),
            workers,
        }
    }

    /// Creates a pool with one worker per available CPU core.
    pub fn with_default_threads() -> Self {
        let num_cpus = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4);
        ThreadPool::new(num_cpus)
    }

    /// Submits a task, distributing load round-robin across all queues.
    ///
    /// # Example
    ///
    /// ```
    /// use taskpool::ThreadPool;
    ///
    /// let pool = ThreadPool::new(2);
    /// pool.submit(|| println!("hello from the pool"));
    /// pool.wait_all();
    /// ```
    pub fn submit<F>(&self, work: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let index = self.next_queue.fetch_add(1, Ordering::Relaxed) % self.shared.queues.len();
        self.push_task(index, work);
    }

    /// Submits a task directly to `queues[index % worker_count]`.
    ///
    /// Targeting a single queue forces the other workers onto the
    /// stealing path, which is how the rebalancing machinery gets
    /// exercised deliberately.
    pub fn submit_to<F>(&self, index: usize, work: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.push_task(index % self.shared.queues.len(), work);
    }

    fn push_task<F>(&self, index: usize, work: F)
    where
        F: FnOnce() + Send + 'static,
    {
        // Increment strictly before the push: a worker may pop and
        // finish the task before this call returns, and the decrement
        // must never observe a counter the increment has not reached.
        self.shared.pending.increment();
        #[cfg(feature = "metrics")]
        self.shared
            .metrics
            .queue_pushes
            .fetch_add(1, Ordering::Relaxed);
        self.shared.queues[index].push(Task::with_pending(work, self.shared.pending.clone()));
    }

    /// Blocks until every submitted task has finished.
    ///
    /// Advisory only: it does not fence against submissions racing in
    /// from other threads while it waits.
    pub fn wait_all(&self) {
        self.shared.pending.wait();
    }

    /// Returns the number of submitted-but-unfinished tasks.
    pub fn pending_tasks(&self) -> usize {
        self.shared.pending.value()
    }

    /// Returns the number of worker threads in the pool.
    pub fn num_workers(&self) -> usize {
        self.shared.queues.len()
    }

    /// Returns a snapshot of pool metrics.
    #[cfg(feature = "metrics")]
    pub fn metrics(&self) -> Option<MetricsSnapshot> {
        Some(self.shared.metrics.snapshot())
    }

    /// Shuts down the pool, draining every queued task first.
    ///
    /// Returns Err describing how many worker threads panicked. Task
    /// panics are isolated by the workers and do not count here.
    pub fn shutdown(mut self) -> Result<(), String> {
        self.join_workers()
            .map_err(|count| format!("{} worker thread(s) panicked", count))
    }

    /// Signals stop and joins all workers, tracking failures.
    fn join_workers(&mut self) -> Result<(), usize> {
        self.shared.running.store(false, Ordering::Relaxed);

        let mut failed_count = 0;
        for worker in self.workers.drain(..) {
            let worker_id = worker.id();
            if worker.join().is_err() {
                failed_count += 1;
                eprintln!("taskpool: worker {} panicked", worker_id);
            }
        }

        if failed_count > 0 {
            Err(failed_count)
        } else {
            Ok(())
        }
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        if !self.workers.is_empty() {
            let _ = self.join_workers();
        }
    }
}

impl Default for ThreadPool {
    fn default() -> Self {
        ThreadPool::with_default_threads()
    }
}
