//! # Taskpool - Work-Stealing Thread Pool
//!
//! A thread pool built around per-worker double-ended task queues. Each
//! worker executes its own queue in LIFO order for cache locality and,
//! when its queue runs dry, steals the oldest task from another worker's
//! queue. Steals are non-blocking: a thief that finds a victim's lock
//! held moves on to the next candidate, so no cycle of waiting threads
//! can form.
//!
//! ## Architecture
//!
//! - **Tasks**: boxed zero-argument closures; a panic inside a task is
//!   caught at the execution boundary and never takes a worker down
//! - **Task queues**: one mutex-protected deque per worker; the owner
//!   pushes and pops at the front, thieves take from the back
//! - **Pending counter**: atomic count of submitted-but-unfinished tasks
//!   with a blocking wait used for drain
//! - **Workers**: OS threads that drain their own queue, steal when
//!   idle, and exit only once shutdown is signalled and no task remains
//!
//! ## Example
//!
//! ```
//! use taskpool::ThreadPool;
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! let pool = ThreadPool::new(4);
//! let done = Arc::new(AtomicUsize::new(0));
//!
//! for _ in 0..16 {
//!     let done = done.clone();
//!     pool.submit(move || {
//!         done.fetch_add(1, Ordering::SeqCst);
//!     });
//! }
//!
//! pool.wait_all();
//! assert_eq!(done.load(Ordering::SeqCst), 16);
//! ```

pub mod counter;
pub mod metrics;
pub mod pool;
pub mod queue;
pub mod task;
pub mod tracing;
pub mod worker;

use serde::{Deserialize, Serialize};

/// Strategy for pinning worker threads to CPU cores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PinningStrategy {
    /// No pinning (standard OS scheduling).
    #[default]
    None,
    /// Linear pinning (worker i -> logical processor i).
    Linear,
}

pub use counter::Counter;
pub use pool::{PoolConfig, ThreadPool};
pub use queue::{Steal, TaskQueue};
pub use task::Task;
