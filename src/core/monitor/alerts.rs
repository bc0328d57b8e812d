//! Alert decisions and the delivery seams.
//!
//! The core decides whether and what to send; [`Notifier`] and [`Mailer`]
//! implementations own the transport. Delivery is best-effort: failures are
//! recorded as system events and never retried.

use chrono::NaiveDateTime;
use colored::Colorize;
use serde::Serialize;

use super::classify::Thresholds;
use super::cooldown::cooldown_key;
use super::reading::{Reading, Status};
use crate::core::stats::Summary;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AlertKind {
    Warning,
    Critical,
}

impl AlertKind {
    pub fn from_status(status: Status) -> Option<Self> {
        match status {
            Status::Warning => Some(AlertKind::Warning),
            Status::Critical => Some(AlertKind::Critical),
            Status::Normal | Status::Unknown => None,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            AlertKind::Warning => "WARNING",
            AlertKind::Critical => "CRITICAL",
        }
    }
}

/// Something worth telling the user about
#[derive(Debug, Clone, Serialize)]
pub struct AlertIntent {
    pub kind: AlertKind,
    pub value: f64,
    pub source: String,
    pub thresholds: Thresholds,
    pub at: NaiveDateTime,
}

impl AlertIntent {
    /// Intent for a reading whose status calls for an alert
    pub fn for_reading(reading: &Reading, thresholds: Thresholds) -> Option<Self> {
        AlertKind::from_status(reading.status).map(|kind| Self {
            kind,
            value: reading.value,
            source: reading.source.clone(),
            thresholds,
            at: reading.timestamp,
        })
    }

    pub fn cooldown_key(&self) -> String {
        cooldown_key(self.kind.tag(), self.value)
    }

    /// Notification title
    pub fn title(&self) -> &'static str {
        match self.kind {
            AlertKind::Critical => "CRITICAL TEMPERATURE ALERT!",
            AlertKind::Warning => "HIGH TEMPERATURE WARNING",
        }
    }

    /// Notification body
    pub fn message(&self) -> String {
        format!("Temperature: {:.1}°C\nSource: {}", self.value, self.source)
    }

    /// Persisted alert line. The value is not preceded by a colon, so range
    /// queries do not count alerts as extra readings.
    pub fn log_text(&self) -> String {
        format!(
            "ALERT {} temperature {:.1}°C from {}",
            self.kind.tag(),
            self.value,
            self.source
        )
    }

    pub fn subject(&self) -> String {
        match self.kind {
            AlertKind::Critical => format!("CRITICAL Temperature Alert - {:.1}°C", self.value),
            AlertKind::Warning => format!("Warning Temperature Alert - {:.1}°C", self.value),
        }
    }

    pub fn body(&self, device: &str) -> String {
        let urgency = match self.kind {
            AlertKind::Critical => "IMMEDIATE ACTION REQUIRED",
            AlertKind::Warning => "Monitor Closely",
        };
        format!(
            "TEMPERATURE ALERT\n\
             =====================================\n\
             \n\
             Alert Type: {kind}\n\
             Temperature: {value:.1}°C\n\
             Source: {source}\n\
             Time: {time}\n\
             \n\
             Urgency: {urgency}\n\
             \n\
             Current Thresholds:\n\
             - Warning: {warning:.1}°C\n\
             - Critical: {critical:.1}°C\n\
             \n\
             Recommended Actions:\n\
             1. Check cooling system\n\
             2. Ensure proper ventilation\n\
             3. Monitor temperature trends\n\
             4. Consider reducing system load\n\
             \n\
             Device: {device}\n",
            kind = self.kind.tag(),
            value = self.value,
            source = self.source,
            time = self.at.format("%Y-%m-%d %H:%M:%S"),
            urgency = urgency,
            warning = self.thresholds.warning(),
            critical = self.thresholds.critical(),
            device = device,
        )
    }
}

/// Periodic report built from what the log store recorded since the last one
#[derive(Debug, Clone, Serialize)]
pub struct ReportIntent {
    pub at: NaiveDateTime,
    pub period_start: NaiveDateTime,
    pub summary: Option<Summary>,
    pub thresholds: Thresholds,
}

impl ReportIntent {
    pub fn subject(&self) -> String {
        format!("Temperature Report - {}", self.at.format("%Y-%m-%d %H:%M"))
    }

    pub fn body(&self) -> String {
        let mut body = format!(
            "Temperature Monitoring Report\n\
             =====================================\n\
             \n\
             Timestamp: {}\n\
             Period: {} to {}\n\
             \n",
            self.at.format("%Y-%m-%d %H:%M:%S"),
            self.period_start.format("%Y-%m-%d %H:%M"),
            self.at.format("%Y-%m-%d %H:%M"),
        );

        match &self.summary {
            Some(summary) => body.push_str(&format!(
                "Period Statistics:\n\
                 - Latest Temperature: {:.1}°C\n\
                 - Minimum Temperature: {:.1}°C\n\
                 - Maximum Temperature: {:.1}°C\n\
                 - Average Temperature: {:.1}°C\n\
                 - Readings: {}\n\
                 \n",
                summary.latest, summary.min, summary.max, summary.mean, summary.count
            )),
            None => body.push_str("Period Statistics: N/A (no readings logged)\n\n"),
        }

        body.push_str(&format!(
            "Threshold Settings:\n\
             - Warning Threshold: {:.1}°C\n\
             - Critical Threshold: {:.1}°C\n",
            self.thresholds.warning(),
            self.thresholds.critical()
        ));
        body
    }
}

/// Desktop-notification channel
pub trait Notifier: Send + Sync {
    fn notify(&self, alert: &AlertIntent) -> Result<()>;
}

/// Outbound email channel
pub trait Mailer: Send + Sync {
    fn send_alert(&self, alert: &AlertIntent) -> Result<()>;
    fn send_report(&self, report: &ReportIntent) -> Result<()>;
}

/// Prints alerts to the terminal
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, alert: &AlertIntent) -> Result<()> {
        let title = match alert.kind {
            AlertKind::Critical => alert.title().red().bold(),
            AlertKind::Warning => alert.title().yellow().bold(),
        };
        println!("{}", title);
        for line in alert.message().lines() {
            println!("  {}", line);
        }
        log::warn!("{}: {:.1}°C from {}", alert.title(), alert.value, alert.source);
        Ok(())
    }
}

/// Records composed emails in the diagnostic log instead of sending them
#[derive(Debug, Default)]
pub struct LogMailer {
    device: String,
}

impl LogMailer {
    pub fn new(device: impl Into<String>) -> Self {
        Self {
            device: device.into(),
        }
    }
}

impl Mailer for LogMailer {
    fn send_alert(&self, alert: &AlertIntent) -> Result<()> {
        log::info!("Email '{}':\n{}", alert.subject(), alert.body(&self.device));
        Ok(())
    }

    fn send_report(&self, report: &ReportIntent) -> Result<()> {
        log::info!("Email '{}':\n{}", report.subject(), report.body());
        Ok(())
    }
}
