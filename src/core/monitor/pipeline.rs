//! One poll iteration: selection, adjustment, classification and alerting.
//!
//! [`Monitor::process`] is synchronous and clock-injected so the whole
//! pipeline can be driven from tests without a runtime.

use chrono::NaiveDateTime;
use std::sync::Arc;
use std::time::Instant;

use super::adjust::Adjustment;
use super::alerts::{AlertIntent, Mailer, Notifier};
use super::classify::{classify, Thresholds};
use super::cooldown::AlertCooldown;
use super::reading::{CandidateReading, LiveSample, Reading};
use super::selector::{PrioritySelector, SourceSelector};
use crate::core::config::Settings;
use crate::core::logstore::LogEntry;
use crate::error::Result;

/// What an iteration produced: the live-view sample and the entries to
/// append, in order.
#[derive(Debug, Clone)]
pub struct PollOutcome {
    pub sample: LiveSample,
    pub entries: Vec<LogEntry>,
}

/// Owns everything the poll loop mutates. Only the polling task holds one.
pub struct Monitor {
    selector: Box<dyn SourceSelector>,
    adjustment: Adjustment,
    thresholds: Thresholds,
    alerts_enabled: bool,
    notify_cooldown: AlertCooldown,
    email_cooldown: AlertCooldown,
    notifier: Arc<dyn Notifier>,
    mailer: Arc<dyn Mailer>,
}

impl Monitor {
    pub fn new(settings: &Settings, notifier: Arc<dyn Notifier>, mailer: Arc<dyn Mailer>) -> Self {
        Self {
            selector: Box::new(PrioritySelector::new(settings.calibration())),
            adjustment: settings.adjustment(),
            thresholds: settings.thresholds(),
            alerts_enabled: settings.alerts_enabled,
            notify_cooldown: AlertCooldown::new(settings.alert_cooldown()),
            email_cooldown: AlertCooldown::new(settings.email_cooldown()),
            notifier,
            mailer,
        }
    }

    /// Replace the selection policy
    pub fn with_selector(mut self, selector: Box<dyn SourceSelector>) -> Self {
        self.selector = selector;
        self
    }

    /// Pick up changed settings. Cooldown timers and the installed selector
    /// survive; only their parameters change.
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.selector.set_calibration(settings.calibration());
        self.adjustment = settings.adjustment();
        self.thresholds = settings.thresholds();
        self.alerts_enabled = settings.alerts_enabled;
        self.notify_cooldown.set_window(settings.alert_cooldown());
        self.email_cooldown.set_window(settings.email_cooldown());
    }

    /// Run one iteration over the sensor collaborator's answer.
    ///
    /// `now` stamps the reading; `instant` drives the cooldowns.
    pub fn process(
        &mut self,
        candidates: Result<Vec<CandidateReading>>,
        now: NaiveDateTime,
        instant: Instant,
    ) -> PollOutcome {
        let selection = candidates.and_then(|c| self.selector.select(&c));

        let selection = match selection {
            Ok(selection) => selection,
            Err(e) => {
                let reason = if e.is_no_data() {
                    "No temperature data available".to_string()
                } else {
                    log::warn!("Sensor read failed: {}", e);
                    e.to_string()
                };
                return PollOutcome {
                    entries: vec![LogEntry::system_event(now, "Sensor Error", &reason)],
                    sample: LiveSample::NoData {
                        timestamp: now,
                        reason,
                    },
                };
            }
        };

        let value = self.adjustment.apply(selection.value);
        let reading = Reading {
            timestamp: now,
            value,
            source: selection.source,
            status: classify(Some(value), &self.thresholds),
        };

        let mut entries = vec![LogEntry::reading(&reading)];
        if self.alerts_enabled {
            if let Some(alert) = AlertIntent::for_reading(&reading, self.thresholds) {
                self.dispatch(&alert, now, instant, &mut entries);
            }
        }

        PollOutcome {
            sample: LiveSample::Reading(reading),
            entries,
        }
    }

    fn dispatch(
        &mut self,
        alert: &AlertIntent,
        now: NaiveDateTime,
        instant: Instant,
        entries: &mut Vec<LogEntry>,
    ) {
        let key = alert.cooldown_key();

        if self.notify_cooldown.should_fire(&key, instant) {
            entries.push(LogEntry::new(now, alert.log_text()));
            if let Err(e) = self.notifier.notify(alert) {
                log::error!("Error sending desktop notification: {}", e);
                entries.push(LogEntry::system_event(
                    now,
                    "Notification Error",
                    &format!("Failed to notify {} alert: {}", alert.kind.tag(), e),
                ));
            }
        }

        if self.email_cooldown.should_fire(&key, instant) {
            let entry = match self.mailer.send_alert(alert) {
                Ok(()) => LogEntry::system_event(
                    now,
                    &format!("{} Alert Email", alert.kind.tag()),
                    &format!("Sent for {:.1}°C", alert.value),
                ),
                Err(e) => {
                    log::error!("Error sending alert email: {}", e);
                    LogEntry::system_event(
                        now,
                        "Email Error",
                        &format!("Failed to send {} alert: {}", alert.kind.tag(), e),
                    )
                }
            };
            entries.push(entry);
        }
    }
}
