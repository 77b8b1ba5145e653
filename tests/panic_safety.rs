use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use taskpool::ThreadPool;

#[test]
fn test_panic_still_decrements_pending() {
    let pool = ThreadPool::new(1);

    pool.submit(|| {
        panic!("Intentional panic for testing");
    });

    // wait_all hangs forever if the panicking task skipped its
    // decrement; the deadline turns that hang into a failure.
    let start = Instant::now();
    while pool.pending_tasks() > 0 {
        assert!(
            start.elapsed() < Duration::from_secs(5),
            "pending counter not decremented after task panic"
        );
        std::thread::sleep(Duration::from_millis(10));
    }

    pool.wait_all();
    assert_eq!(pool.pending_tasks(), 0);
}

#[test]
fn test_worker_survives_task_panic() {
    let pool = ThreadPool::new(1);

    // 1. Submit panicking task
    pool.submit(|| panic!("Boom"));
    pool.wait_all();

    // 2. Submit normal task to verify the worker is still alive
    let success = Arc::new(AtomicBool::new(false));
    let success_clone = success.clone();

    pool.submit(move || {
        success_clone.store(true, Ordering::SeqCst);
    });

    let start = Instant::now();
    while !success.load(Ordering::SeqCst) {
        assert!(
            start.elapsed() < Duration::from_secs(1),
            "Worker did not process subsequent task!"
        );
        std::thread::sleep(Duration::from_millis(10));
    }

    pool.shutdown().expect("Shutdown failed");
}

#[test]
fn test_panics_interleaved_with_normal_tasks() {
    let pool = ThreadPool::new(4);
    let completed = Arc::new(AtomicUsize::new(0));

    for i in 0..100 {
        let completed = completed.clone();
        pool.submit(move || {
            if i % 10 == 0 {
                panic!("scripted failure");
            }
            completed.fetch_add(1, Ordering::SeqCst);
        });
    }

    pool.wait_all();
    assert_eq!(completed.load(Ordering::SeqCst), 90);
    assert_eq!(pool.pending_tasks(), 0);

    // Worker-thread panics would surface here; task panics must not.
    pool.shutdown().expect("task panics leaked into worker threads");
}
