//! Periodic report task.

use chrono::{Local, NaiveDateTime};
use std::sync::Arc;
use tokio::sync::{broadcast, watch};
use tokio::time::{interval, MissedTickBehavior};

use super::{enqueue, LogQueue};
use crate::core::config::Settings;
use crate::core::logstore::{LogEntry, LogStore};
use crate::core::monitor::{Mailer, ReportIntent};
use crate::core::stats::Summary;

/// Task that mails a summary of the logged readings every report interval.
///
/// Checks the clock every `report_check_secs`; the report covers everything
/// logged since the previous report (or since the task started).
pub async fn report_task(
    store: Arc<LogStore>,
    mailer: Arc<dyn Mailer>,
    settings_rx: watch::Receiver<Settings>,
    queue: LogQueue,
    mut shutdown: broadcast::Receiver<()>,
) {
    log::info!("Report task started");

    let mut ticker = interval(settings_rx.borrow().report_check());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut last_report = Local::now().naive_local();

    loop {
        tokio::select! {
            biased;

            _ = shutdown.recv() => {
                log::info!("Report task shutting down");
                break;
            }
            _ = ticker.tick() => {
                let settings = settings_rx.borrow().clone();
                let now = Local::now().naive_local();
                let due = (now - last_report)
                    .to_std()
                    .map(|elapsed| elapsed >= settings.report_interval())
                    .unwrap_or(false);
                if !due {
                    continue;
                }

                let entry = send_report(&store, &mailer, &settings, last_report, now).await;
                enqueue(&queue, [entry]);
                last_report = now;
            }
        }
    }
}

async fn send_report(
    store: &Arc<LogStore>,
    mailer: &Arc<dyn Mailer>,
    settings: &Settings,
    period_start: NaiveDateTime,
    now: NaiveDateTime,
) -> LogEntry {
    let store = store.clone();
    let mailer = mailer.clone();
    let thresholds = settings.thresholds();

    let result = tokio::task::spawn_blocking(move || {
        let entries = store.read_range(period_start, now);
        let report = ReportIntent {
            at: now,
            period_start,
            summary: Summary::from_entries(&entries),
            thresholds,
        };
        mailer.send_report(&report)
    })
    .await;

    match result {
        Ok(Ok(())) => LogEntry::system_event(now, "Daily Report", "Email report sent"),
        Ok(Err(e)) => {
            log::error!("Error sending report: {}", e);
            LogEntry::system_event(now, "Report Error", &format!("Failed to send report: {}", e))
        }
        Err(e) => {
            log::error!("Report task failed: {}", e);
            LogEntry::system_event(now, "Report Error", &e.to_string())
        }
    }
}
