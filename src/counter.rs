//! Counter-based synchronization for task completion tracking.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex};

struct InnerCounter {
    value: AtomicUsize,
    // The mutex/condvar pair only serializes the park/notify handshake;
    // the value itself is read and written through the atomic.
    lock: Mutex<()>,
    zero: Condvar,
}

/// A thread-safe counter for tracking task completion.
///
/// The pool increments the counter on every submission and each task
/// decrements it once it has run (or panicked). `wait` blocks until the
/// counter reaches zero.
#[derive(Clone)]
pub struct Counter {
    inner: Arc<InnerCounter>,
}

impl Counter {
    /// Creates a new counter with the specified initial value.
    pub fn new(initial: usize) -> Self {
        Counter {
            inner: Arc::new(InnerCounter {
                value: AtomicUsize::new(initial),
                lock: Mutex::new(()),
                zero: Condvar::new(),
            }),
        }
    }

    /// Increments the counter by one.
    pub fn increment(&self) {
        self.inner.value.fetch_add(1, Ordering::SeqCst);
    }

    /// Decrements the counter by one and wakes waiters if it reached zero.
    ///
    /// Returns true if the counter reached zero.
    pub fn decrement(&self) -> bool {
        // Release ordering so work done before the decrement is visible
        // to whoever observes the zero.
        let old_val = self.inner.value.fetch_sub(1, Ordering::Release);
        debug_assert!(old_val > 0, "counter decremented below zero");
        if old_val == 1 {
            // Taking the lock closes the window between a waiter's check
            // and its park; a notify cannot slip in between the two.
            let _guard = self.inner.lock.lock().unwrap();
            self.inner.zero.notify_all();
            true
        } else {
            false
        }
    }

    /// Returns the current value of the counter.
    pub fn value(&self) -> usize {
        self.inner.value.load(Ordering::SeqCst)
    }

    /// Checks if the counter has reached zero.
    pub fn is_complete(&self) -> bool {
        self.value() == 0
    }

    /// Blocks the calling thread until the counter reaches zero.
    ///
    /// Spins briefly first so short-lived batches never pay for a park,
    /// then waits on the condvar signalled by the final decrement.
    pub fn wait(&self) {
        const SPIN_LIMIT: usize = 5000;

        let mut spin_count = 0;
        while !self.is_complete() && spin_count < SPIN_LIMIT {
            std::hint::spin_loop();
            spin_count += 1;
        }
        if self.is_complete() {
            return;
        }

        let mut guard = self.inner.lock.lock().unwrap();
        while !self.is_complete() {
            guard = self.inner.zero.wait(guard).unwrap();
        }
    }
}
