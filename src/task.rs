//! Task definitions and execution logic.
//!
//! Tasks are opaque units of work submitted to the pool. They carry the
//! pool's pending counter so completion is recorded no matter which
//! worker ends up running them.

use crate::counter::Counter;
use std::panic::{self, AssertUnwindSafe};

/// A unit of work to be executed by the thread pool.
///
/// Tasks consist of a closure to execute and an optional counter
/// that is decremented once the closure has run.
pub struct Task {
    /// The work to be executed
    work: Box<dyn FnOnce() + Send + 'static>,
    /// Optional counter to decrement when the task completes
    pending: Option<Counter>,
}

impl Task {
    /// Creates a new task with the given work function.
    pub fn new<F>(work: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Task {
            work: Box::new(work),
            pending: None,
        }
    }

    /// Creates a new task tracked by a pending counter.
    pub fn with_pending<F>(work: F, pending: Counter) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Task {
            work: Box::new(work),
            pending: Some(pending),
        }
    }

    /// Executes the task, isolating panics from the calling worker.
    ///
    /// The pending counter is decremented on both the clean and the
    /// panic path; dropping the decrement would leave `wait_all` parked
    /// forever. Returns true if the closure returned normally.
    pub fn execute(self) -> bool {
        let work = self.work;
        let result = panic::catch_unwind(AssertUnwindSafe(move || work()));

        if let Some(pending) = self.pending {
            pending.decrement();
        }

        result.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_task_execution() {
        let executed = Arc::new(AtomicBool::new(false));
        let executed_clone = executed.clone();

        let task = Task::new(move || {
            executed_clone.store(true, Ordering::SeqCst);
        });

        assert!(task.execute());
        assert!(executed.load(Ordering::SeqCst));
    }

    #[test]
    fn test_task_with_pending_counter() {
        let counter = Counter::new(1);
        let counter_clone = counter.clone();

        let task = Task::with_pending(
            move || {
                // Do some work
            },
            counter_clone,
        );

        assert_eq!(counter.value(), 1);
        task.execute();
        assert_eq!(counter.value(), 0);
    }

    #[test]
    fn test_panicking_task_still_decrements() {
        let counter = Counter::new(1);
        let task = Task::with_pending(
            || {
                panic!("Intentional panic for testing");
            },
            counter.clone(),
        );

        assert!(!task.execute());
        assert!(counter.is_complete());
    }
}
