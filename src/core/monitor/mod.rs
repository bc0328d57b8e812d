//! Temperature monitoring core.
//!
//! Candidate readings flow through source selection, the user adjustment
//! and threshold classification; alert-worthy readings pass two independent
//! cooldowns before reaching the notification and email channels.

pub mod adjust;
pub mod alerts;
mod classify;
mod cooldown;
mod pipeline;
mod reading;
pub mod runtime;
mod selector;
mod tasks;

pub use adjust::{adjust, Adjustment};
pub use alerts::{
    AlertIntent, AlertKind, ConsoleNotifier, LogMailer, Mailer, Notifier, ReportIntent,
};
pub use classify::{classify, Thresholds};
pub use cooldown::{cooldown_key, AlertCooldown};
pub use pipeline::{Monitor, PollOutcome};
pub use reading::{CandidateReading, LiveSample, Reading, SensorCategory, Status};
pub use runtime::MonitorRuntime;
pub use selector::{Calibration, PrioritySelector, Selection, SourceSelector};
