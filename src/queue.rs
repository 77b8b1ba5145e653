//! Per-worker task queues.
//!
//! Each worker owns exactly one queue. The owner pushes and pops at the
//! front, so recently pushed work runs first and stays hot in cache;
//! thieves take from the back, so they get the oldest work and stay away
//! from the end the owner is operating on. The deque body is guarded by
//! a single mutex with minimal scope: no task code ever runs while a
//! queue lock is held.

use crate::task::Task;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Outcome of a non-blocking steal attempt.
pub enum Steal {
    /// A task was taken from the back of the victim's queue.
    Success(Task),
    /// The victim's queue was empty.
    Empty,
    /// The victim's lock was held; try another victim.
    Retry,
}

/// A double-ended, mutex-protected queue of tasks.
pub struct TaskQueue {
    tasks: Mutex<VecDeque<Task>>,
}

impl TaskQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        TaskQueue {
            tasks: Mutex::new(VecDeque::new()),
        }
    }

    /// Appends a task at the front of the queue.
    pub fn push(&self, task: Task) {
        self.tasks.lock().unwrap().push_front(task);
    }

    /// Removes and returns the task at the front of the queue.
    ///
    /// Called by the owning worker only; together with `push` this gives
    /// the owner LIFO order.
    pub fn pop(&self) -> Option<Task> {
        self.tasks.lock().unwrap().pop_front()
    }

    /// Removes and returns the oldest task (the back of the queue).
    ///
    /// Blocks on the queue lock. Prefer `try_steal` from worker code so
    /// a contended victim never stalls the thief.
    pub fn steal(&self) -> Option<Task> {
        self.tasks.lock().unwrap().pop_back()
    }

    /// Non-blocking steal: gives up rather than waiting on a held lock.
    pub fn try_steal(&self) -> Steal {
        match self.tasks.try_lock() {
            Ok(mut tasks) => match tasks.pop_back() {
                Some(task) => Steal::Success(task),
                None => Steal::Empty,
            },
            Err(_) => Steal::Retry,
        }
    }

    /// Returns the number of queued tasks.
    pub fn len(&self) -> usize {
        self.tasks.lock().unwrap().len()
    }

    /// Checks whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.tasks.lock().unwrap().is_empty()
    }
}

impl Default for TaskQueue {
    fn default() -> Self {
        TaskQueue::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn recording_task(log: &Arc<Mutex<Vec<usize>>>, id: usize) -> Task {
        let log = log.clone();
        Task::new(move || {
            log.lock().unwrap().push(id);
        })
    }

    #[test]
    fn test_owner_pop_is_lifo() {
        let queue = TaskQueue::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        for id in [1, 2, 3] {
            queue.push(recording_task(&log, id));
        }
        while let Some(task) = queue.pop() {
            task.execute();
        }

        assert_eq!(*log.lock().unwrap(), vec![3, 2, 1]);
    }

    #[test]
    fn test_thief_steal_is_fifo() {
        let queue = TaskQueue::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        for id in [1, 2, 3] {
            queue.push(recording_task(&log, id));
        }
        while let Some(task) = queue.steal() {
            task.execute();
        }

        assert_eq!(*log.lock().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_try_steal_reports_empty() {
        let queue = TaskQueue::new();
        assert!(matches!(queue.try_steal(), Steal::Empty));
    }

    #[test]
    fn test_try_steal_takes_oldest() {
        let queue = TaskQueue::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        queue.push(recording_task(&log, 1));
        queue.push(recording_task(&log, 2));

        match queue.try_steal() {
            Steal::Success(task) => {
                task.execute();
            }
            _ => panic!("expected a task"),
        }

        assert_eq!(*log.lock().unwrap(), vec![1]);
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_len_and_is_empty() {
        let queue = TaskQueue::new();
        assert!(queue.is_empty());
        assert_eq!(queue.len(), 0);

        queue.push(Task::new(|| {}));
        assert!(!queue.is_empty());
        assert_eq!(queue.len(), 1);

        queue.pop();
        assert!(queue.is_empty());
    }
}
