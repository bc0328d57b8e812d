//! Temperature polling task.

use chrono::Local;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{broadcast, watch};
use tokio::time::{interval, MissedTickBehavior};

use super::{enqueue, LogQueue};
use crate::core::config::Settings;
use crate::core::monitor::{LiveSample, Monitor};
use crate::error::ThermologError;
use crate::platform::SensorSource;

/// Task that samples, classifies and logs one reading per tick.
///
/// Polling frequency: `refresh_interval_secs` from the settings, re-read
/// whenever the settings channel changes. Shutdown is only observed between
/// iterations, so an iteration is never half-applied.
pub async fn poll_task(
    mut monitor: Monitor,
    mut sensors: Box<dyn SensorSource>,
    mut settings_rx: watch::Receiver<Settings>,
    sample_tx: watch::Sender<Arc<LiveSample>>,
    queue: LogQueue,
    mut shutdown: broadcast::Receiver<()>,
) {
    log::info!("Temperature polling task started");

    let mut period = settings_rx.borrow().refresh_interval();
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut settings_open = true;

    loop {
        tokio::select! {
            biased;

            _ = shutdown.recv() => {
                log::info!("Polling task shutting down");
                break;
            }
            changed = settings_rx.changed(), if settings_open => {
                if changed.is_err() {
                    // Settings sender dropped: keep the last known settings
                    settings_open = false;
                    continue;
                }
                let settings = settings_rx.borrow_and_update().clone();
                monitor.apply_settings(&settings);
                if settings.refresh_interval() != period {
                    period = settings.refresh_interval();
                    ticker = interval(period);
                    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
                    log::info!("Refresh interval changed to {:?}", period);
                }
            }
            _ = ticker.tick() => {
                // Sensor access may block; run the whole iteration off the
                // async workers and take the state back afterwards. A panic
                // in a sensor backend becomes a logged sensor error.
                let iteration = tokio::task::spawn_blocking(move || {
                    let now = Local::now().naive_local();
                    let result = panic::catch_unwind(AssertUnwindSafe(|| {
                        let candidates = sensors.candidates();
                        monitor.process(candidates, now, Instant::now())
                    }));
                    let outcome = match result {
                        Ok(outcome) => outcome,
                        Err(payload) => {
                            let error = ThermologError::system_monitor(format!(
                                "sensor backend panicked: {}",
                                panic_message(payload.as_ref())
                            ));
                            log::error!("Poll iteration failed: {}", error);
                            monitor.process(Err(error), now, Instant::now())
                        }
                    };
                    (monitor, sensors, outcome)
                })
                .await;

                let outcome = match iteration {
                    Ok((m, s, outcome)) => {
                        monitor = m;
                        sensors = s;
                        outcome
                    }
                    Err(e) => {
                        log::error!("Poll iteration failed: {}", e);
                        break;
                    }
                };

                enqueue(&queue, outcome.entries);

                // watch::send() only fails if there are no receivers (which is fine)
                let _ = sample_tx.send(Arc::new(outcome.sample));
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
