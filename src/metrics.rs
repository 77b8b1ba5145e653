#[cfg(feature = "metrics")]
use std::sync::atomic::{AtomicU64, Ordering};
#[cfg(feature = "metrics")]
use std::time::Instant;

/// Optional performance metrics for the thread pool.
#[cfg(feature = "metrics")]
#[derive(Debug)]
pub struct Metrics {
    /// Total tasks executed, panicking ones included.
    pub tasks_completed: AtomicU64,
    /// Tasks whose closure panicked.
    pub tasks_panicked: AtomicU64,
    /// Total pushes into worker queues.
    pub queue_pushes: AtomicU64,
    /// Total pops by queue owners.
    pub queue_pops: AtomicU64,
    /// Steal attempts that took a task from a victim.
    pub steals_success: AtomicU64,
    /// Full steal rotations that found nothing.
    pub steals_failed: AtomicU64,
    /// Victims skipped because their lock was held.
    pub steals_retry: AtomicU64,
    /// Time when metrics collection started.
    pub start_time: Instant,
}

#[cfg(feature = "metrics")]
impl Metrics {
    /// Creates a new metrics instance.
    pub fn new() -> Self {
        Self {
            tasks_completed: AtomicU64::new(0),
            tasks_panicked: AtomicU64::new(0),
            queue_pushes: AtomicU64::new(0),
            queue_pops: AtomicU64::new(0),
            steals_success: AtomicU64::new(0),
            steals_failed: AtomicU64::new(0),
            steals_retry: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Returns a snapshot of current metrics values.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            tasks_completed: self.tasks_completed.load(Ordering::Relaxed),
            tasks_panicked: self.tasks_panicked.load(Ordering::Relaxed),
            queue_pushes: self.queue_pushes.load(Ordering::Relaxed),
            queue_pops: self.queue_pops.load(Ordering::Relaxed),
            steals_success: self.steals_success.load(Ordering::Relaxed),
            steals_failed: self.steals_failed.load(Ordering::Relaxed),
            steals_retry: self.steals_retry.load(Ordering::Relaxed),
            elapsed_seconds: self.start_time.elapsed().as_secs_f64(),
        }
    }
}

#[cfg(feature = "metrics")]
impl Default for Metrics {
    fn default() -> Self {
        Metrics::new()
    }
}

/// Snapshot of metrics at a point in time.
#[cfg(feature = "metrics")]
#[derive(Debug, Clone)]
pub struct MetricsSnapshot {
    pub tasks_completed: u64,
    pub tasks_panicked: u64,
    pub queue_pushes: u64,
    pub queue_pops: u64,
    pub steals_success: u64,
    pub steals_failed: u64,
    pub steals_retry: u64,
    pub elapsed_seconds: f64,
}

#[cfg(feature = "metrics")]
impl MetricsSnapshot {
    /// Calculates tasks per second throughput.
    pub fn tasks_per_second(&self) -> f64 {
        if self.elapsed_seconds > 0.0 {
            self.tasks_completed as f64 / self.elapsed_seconds
        } else {
            0.0
        }
    }

    /// Fraction of executed tasks that arrived by stealing.
    pub fn steal_ratio(&self) -> f64 {
        if self.tasks_completed > 0 {
            self.steals_success as f64 / self.tasks_completed as f64
        } else {
            0.0
        }
    }
}
