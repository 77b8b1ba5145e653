//! Chrome Tracing collector for pool visualization.
//!
//! Records task spans into thread-local buffers with no cross-thread
//! contention on the hot path. Each worker flushes its buffer into the
//! global list when it exits; `export_to_file` then writes JSON that
//! chrome://tracing or ui.perfetto.dev can load, one lane per worker.

use std::cell::RefCell;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::sync::Mutex;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// A single trace event in Chrome Tracing format.
#[derive(Debug, Clone)]
pub struct TraceEvent {
    pub name: &'static str,
    pub worker_id: usize,
    pub start_us: u64,
    pub duration_us: u64,
}

thread_local! {
    static TRACE_BUFFER: RefCell<Vec<TraceEvent>> = RefCell::new(Vec::with_capacity(1024));
}

lazy_static::lazy_static! {
    static ref GLOBAL_START: Instant = Instant::now();
    static ref EPOCH_START_US: u64 = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_micros() as u64;
    static ref ALL_BUFFERS: Mutex<Vec<Vec<TraceEvent>>> = Mutex::new(Vec::new());
}

/// Records a span of work on the calling thread's buffer.
pub fn record_event(
    name: &'static str,
    worker_id: usize,
    start: Instant,
    duration: std::time::Duration,
) {
    let start_us = (start.duration_since(*GLOBAL_START).as_micros() as u64) + *EPOCH_START_US;
    let duration_us = duration.as_micros() as u64;

    TRACE_BUFFER.with(|buf| {
        buf.borrow_mut().push(TraceEvent {
            name,
            worker_id,
            start_us,
            duration_us,
        });
    });
}

/// Flushes the calling thread's buffer into the global list.
/// Each worker does this when it exits; events still sitting in a live
/// worker's buffer are not visible to `export_to_file` yet.
pub fn collect_local_trace() {
    TRACE_BUFFER.with(|buf| {
        let mut local_buf = buf.borrow_mut();
        if !local_buf.is_empty() {
            let mut global = ALL_BUFFERS.lock().unwrap();
            global.push(std::mem::take(&mut *local_buf));
        }
    });
}

/// Exports all collected trace events to a JSON file.
pub fn export_to_file(path: &str) -> std::io::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    let buffers = ALL_BUFFERS.lock().unwrap();

    write!(writer, "[\n")?;
    let mut first = true;

    for buffer in buffers.iter() {
        for event in buffer {
            if !first {
                write!(writer, ",\n")?;
            }
            first = false;

            // ph: X is "Complete Event" (requires dur); tid keys the
            // per-worker lane.
            write!(
                writer,
                "{{\"name\":\"{}\",\"ph\":\"X\",\"ts\":{},\"dur\":{},\"pid\":1,\"tid\":{}}}",
                event.name, event.start_us, event.duration_us, event.worker_id
            )?;
        }
    }

    write!(writer, "\n]\n")?;
    writer.flush()?;

    Ok(())
}

/// RAII span: records from construction to drop.
pub struct TraceGuard {
    name: &'static str,
    worker_id: usize,
    start: Instant,
}

impl TraceGuard {
    pub fn new(name: &'static str, worker_id: usize) -> Self {
        Self {
            name,
            worker_id,
            start: Instant::now(),
        }
    }
}

impl Drop for TraceGuard {
    fn drop(&mut self) {
        record_event(self.name, self.worker_id, self.start, self.start.elapsed());
    }
}

/// RAII guard that flushes the local buffer when dropped.
pub struct CollectorGuard;

impl Drop for CollectorGuard {
    fn drop(&mut self) {
        collect_local_trace();
    }
}
