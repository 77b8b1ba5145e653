//! Worker thread implementation.
//!
//! Worker threads continuously pull tasks from their own queue and
//! execute them, stealing from other workers' queues when their own
//! runs dry. A worker holds at most one queue lock at any moment: its
//! own pop has already released the lock before any victim is probed,
//! and victims are only ever probed with a try-lock. No lock-ordering
//! discipline is needed because no thread ever waits on a second lock.

use crate::pool::Shared;
use crate::queue::Steal;
use crate::task::Task;
use crate::tracing::{CollectorGuard, TraceGuard};
use crate::PinningStrategy;
use crossbeam::utils::Backoff;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// A worker thread that executes tasks from its queue.
pub struct Worker {
    id: usize,
    handle: Option<JoinHandle<()>>,
}

impl Worker {
    /// Creates and starts a new worker thread bound to queue `id`.
    pub(crate) fn new(id: usize, shared: Arc<Shared>, pinning: PinningStrategy) -> Self {
        let handle = thread::spawn(move || {
            // Pin worker to its core for better cache locality
            if pinning == PinningStrategy::Linear {
                if let Some(core_ids) = core_affinity::get_core_ids() {
                    if id < core_ids.len() {
                        core_affinity::set_for_current(core_ids[id]);
                    }
                }
            }

            Worker::run_loop(id, shared);
        });

        Worker {
            id,
            handle: Some(handle),
        }
    }

    /// Main execution loop for the worker thread.
    ///
    /// Order of preference each round: own queue (LIFO), then one
    /// rotation of steal attempts over the other queues, then backoff.
    /// The loop exits once shutdown has been signalled and the pending
    /// counter reads zero, so tasks left in any queue (including queues
    /// whose owner is idle) are still drained through stealing.
    fn run_loop(id: usize, shared: Arc<Shared>) {
        let _collector = CollectorGuard;
        let backoff = Backoff::new();

        loop {
            if let Some(task) = shared.queues[id].pop() {
                #[cfg(feature = "metrics")]
                shared.metrics.queue_pops.fetch_add(1, Ordering::Relaxed);
                backoff.reset();
                Self::execute_task(id, task, &shared);
                continue;
            }

            if let Some(task) = Self::steal(id, &shared) {
                backoff.reset();
                Self::execute_task(id, task, &shared);
                continue;
            }

            if !shared.running.load(Ordering::Relaxed) && shared.pending.is_complete() {
                break;
            }

            // No work available; spin briefly, then yield.
            backoff.snooze();
        }
    }

    /// Runs one task, recording its span and surfacing panics.
    fn execute_task(id: usize, task: Task, shared: &Shared) {
        let completed = {
            let _span = TraceGuard::new("task", id);
            task.execute()
        };

        if !completed {
            eprintln!("taskpool: task panicked on worker {}", id);
        }

        #[cfg(feature = "metrics")]
        {
            shared.metrics.tasks_completed.fetch_add(1, Ordering::Relaxed);
            if !completed {
                shared.metrics.tasks_panicked.fetch_add(1, Ordering::Relaxed);
            }
        }
        #[cfg(not(feature = "metrics"))]
        let _ = shared;
    }

    /// Visits every other queue once, nearest neighbor first, and takes
    /// the first task it can get. A held victim lock is skipped, not
    /// waited on.
    fn steal(id: usize, shared: &Shared) -> Option<Task> {
        let num_queues = shared.queues.len();

        for offset in 1..num_queues {
            let victim = (id + offset) % num_queues;
            match shared.queues[victim].try_steal() {
                Steal::Success(task) => {
                    #[cfg(feature = "metrics")]
                    shared.metrics.steals_success.fetch_add(1, Ordering::Relaxed);
                    return Some(task);
                }
                Steal::Empty => {}
                Steal::Retry => {
                    #[cfg(feature = "metrics")]
                    shared.metrics.steals_retry.fetch_add(1, Ordering::Relaxed);
                }
            }
        }

        #[cfg(feature = "metrics")]
        shared.metrics.steals_failed.fetch_add(1, Ordering::Relaxed);
        None
    }

    /// Returns the worker's ID.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Waits for the worker thread to finish.
    pub fn join(mut self) -> thread::Result<()> {
        if let Some(handle) = self.handle.take() {
            handle.join()
        } else {
            Ok(())
        }
    }
}
