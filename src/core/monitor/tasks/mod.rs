//! Async tasks driving the live monitor.
//!
//! The poll and report tasks never share mutable state; both hand their log
//! entries to the single writer task, which is the only path to disk.

mod poll;
mod report;
mod writer;

pub use poll::poll_task;
pub use report::report_task;
pub use writer::log_writer_task;

use tokio::sync::mpsc;

use crate::core::logstore::LogEntry;

/// Producer side of the writer queue
pub type LogQueue = mpsc::UnboundedSender<LogEntry>;

/// Queue entries without waiting for them to hit the disk.
pub(crate) fn enqueue(queue: &LogQueue, entries: impl IntoIterator<Item = LogEntry>) {
    for entry in entries {
        if let Err(e) = queue.send(entry) {
            log::error!("Log writer gone, dropping entry: {}", e.0);
        }
    }
}
