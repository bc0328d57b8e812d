//! Tokio runtime driving the live monitor.
//!
//! Owns the poll, report and log writer tasks. The poll task publishes every
//! iteration's sample on a watch channel; settings flow the other way.

use chrono::Local;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;

use super::alerts::{Mailer, Notifier};
use super::pipeline::Monitor;
use super::reading::LiveSample;
use super::tasks::{log_writer_task, poll_task, report_task, LogQueue};
use crate::core::config::Settings;
use crate::core::logstore::{LogEntry, LogStore};
use crate::platform::SensorSource;

/// How long shutdown waits for queued entries to reach the disk
const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Handle to the background monitor.
pub struct MonitorRuntime {
    /// Latest live sample, `Pending` until the first iteration completes
    pub sample_rx: watch::Receiver<Arc<LiveSample>>,

    /// Push changed settings to the running tasks
    pub settings_tx: watch::Sender<Settings>,

    shutdown_tx: broadcast::Sender<()>,
    store: Arc<LogStore>,
    writer: JoinHandle<()>,
    runtime: tokio::runtime::Runtime,
}

impl MonitorRuntime {
    /// Build the runtime and spawn all monitor tasks.
    pub fn start(
        settings: Settings,
        store: Arc<LogStore>,
        sensors: Box<dyn SensorSource>,
        notifier: Arc<dyn Notifier>,
        mailer: Arc<dyn Mailer>,
    ) -> anyhow::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_time()
            .thread_name("thermolog-worker")
            .build()?;

        let (sample_tx, sample_rx) = watch::channel(Arc::new(LiveSample::Pending));
        let (settings_tx, settings_rx) = watch::channel(settings.clone());
        let (shutdown_tx, _) = broadcast::channel::<()>(1);
        let (queue, queue_rx) = mpsc::unbounded_channel::<LogEntry>();

        // Startup is written before any task can queue a reading
        store.append_or_log(&LogEntry::system_event(
            Local::now().naive_local(),
            "System Startup",
            "Temperature monitoring started",
        ));

        let writer = runtime.spawn(log_writer_task(store.clone(), queue_rx));

        let monitor = Monitor::new(&settings, notifier, mailer.clone());
        {
            let _guard = runtime.enter();
            spawn_all_tasks(
                monitor,
                sensors,
                store.clone(),
                mailer,
                settings_rx,
                sample_tx,
                queue,
                &shutdown_tx,
            );
        }

        log::info!("Monitor runtime started, logging to {}", store.dir().display());

        Ok(Self {
            sample_rx,
            settings_tx,
            shutdown_tx,
            store,
            writer,
            runtime,
        })
    }

    /// Latest sample without waiting
    pub fn latest(&self) -> Arc<LiveSample> {
        self.sample_rx.borrow().clone()
    }

    /// Apply new settings to the running tasks
    pub fn update_settings(&self, settings: Settings) {
        // Only fails once every task has exited
        let _ = self.settings_tx.send(settings);
    }

    /// Signal the tasks, drain the writer queue and log the shutdown event.
    pub fn shutdown(self) {
        let Self {
            shutdown_tx,
            store,
            writer,
            runtime,
            ..
        } = self;

        log::info!("Shutting down monitor runtime");
        let _ = shutdown_tx.send(());

        // The writer exits once both producers have dropped their queue handle
        let drained = runtime.block_on(async move { tokio::time::timeout(DRAIN_TIMEOUT, writer).await });
        if drained.is_err() {
            log::warn!("Log writer did not drain within {:?}", DRAIN_TIMEOUT);
        }

        store.append_or_log(&LogEntry::system_event(
            Local::now().naive_local(),
            "System Shutdown",
            "Temperature monitoring stopped",
        ));

        runtime.shutdown_timeout(Duration::from_secs(1));
    }
}

/// Spawn the poll and report tasks, both feeding the same writer queue.
///
/// Must be called from within the runtime context.
#[allow(clippy::too_many_arguments)]
pub fn spawn_all_tasks(
    monitor: Monitor,
    sensors: Box<dyn SensorSource>,
    store: Arc<LogStore>,
    mailer: Arc<dyn Mailer>,
    settings_rx: watch::Receiver<Settings>,
    sample_tx: watch::Sender<Arc<LiveSample>>,
    queue: LogQueue,
    shutdown: &broadcast::Sender<()>,
) {
    tokio::spawn(poll_task(
        monitor,
        sensors,
        settings_rx.clone(),
        sample_tx,
        queue.clone(),
        shutdown.subscribe(),
    ));

    tokio::spawn(report_task(
        store,
        mailer,
        settings_rx,
        queue,
        shutdown.subscribe(),
    ));
}
