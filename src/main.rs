use std::process;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use taskpool::ThreadPool;

fn main() {
    println!("Taskpool - Work-Stealing Thread Pool\n");

    let num_threads = 4;

    // Example 1: balanced round-robin submission
    println!("Example 1: Round-robin submission");
    let pool = ThreadPool::new(num_threads);
    let sum = Arc::new(AtomicUsize::new(0));
    let num_tasks = 1000;

    let start = Instant::now();
    for i in 0..num_tasks {
        let sum_clone = sum.clone();
        pool.submit(move || {
            sum_clone.fetch_add(i, Ordering::SeqCst);
        });
    }
    pool.wait_all();

    let expected: usize = (0..num_tasks).sum();
    println!(
        "  Executed {} tasks in {:?} (sum {}, expected {})\n",
        num_tasks,
        start.elapsed(),
        sum.load(Ordering::SeqCst),
        expected
    );
    pool.shutdown().expect("shutdown failed");

    // Example 2: skewed load. All tasks land on queue 0, so workers
    // 1..3 start empty and must steal everything they run.
    println!("Example 2: Skewed load with stealing");
    const NUM_TASKS: usize = 500;
    let completed = Arc::new(AtomicUsize::new(0));

    // Watchdog: if the run hangs past its deadline, report and
    // force-exit the process.
    let watchdog_completed = completed.clone();
    thread::spawn(move || {
        thread::sleep(Duration::from_secs(10));
        if watchdog_completed.load(Ordering::SeqCst) < NUM_TASKS {
            println!(
                "TIMEOUT: Completed {}/{} tasks",
                watchdog_completed.load(Ordering::SeqCst),
                NUM_TASKS
            );
            process::exit(1);
        }
    });

    let start = Instant::now();
    {
        let pool = ThreadPool::new(num_threads);
        for _ in 0..NUM_TASKS {
            let completed = completed.clone();
            pool.submit_to(0, move || {
                // Simulate a moderate amount of work.
                let mut x = 0usize;
                for j in 0..10_000 {
                    x = x.wrapping_add(j);
                }
                std::hint::black_box(x);
                completed.fetch_add(1, Ordering::SeqCst);
            });
        }
        pool.wait_all();
    }

    println!(
        "  Completed {} tasks in {:?}\n",
        completed.load(Ordering::SeqCst),
        start.elapsed()
    );

    // Workers have exited, so their span buffers are flushed and
    // exportable.
    match taskpool::tracing::export_to_file("taskpool-trace.json") {
        Ok(()) => println!("Trace written to taskpool-trace.json"),
        Err(e) => println!("Trace export failed: {}", e),
    }
}
