//! Log writer task.

use std::sync::Arc;
use tokio::sync::mpsc;

use crate::core::logstore::{LogEntry, LogStore};

/// Appends queued entries one at a time, in queue order.
///
/// Runs until every sender is dropped, so entries queued before shutdown
/// still reach the disk.
pub async fn log_writer_task(store: Arc<LogStore>, mut queue: mpsc::UnboundedReceiver<LogEntry>) {
    while let Some(entry) = queue.recv().await {
        let store = store.clone();
        match tokio::task::spawn_blocking(move || store.append(&entry)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => log::error!("Error writing to log file: {}", e),
            Err(e) => log::error!("Log write task failed: {}", e),
        }
    }

    log::debug!("Log writer drained, exiting");
}
