//! Per-key alert suppression.
//!
//! Each channel (desktop notification, email) owns its own [`AlertCooldown`];
//! they never share timers.

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Build the cooldown key for an alert kind and value.
///
/// The value is rounded to whole degrees: 29.6 and 30.4 share a key,
/// 30.4 and 30.6 do not.
pub fn cooldown_key(kind: &str, value: f64) -> String {
    format!("{}_{:.0}", kind, value)
}

/// Timer store suppressing repeated alerts inside a window.
#[derive(Debug, Clone)]
pub struct AlertCooldown {
    window: Duration,
    last_fired: HashMap<String, Instant>,
}

impl AlertCooldown {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_fired: HashMap::new(),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn set_window(&mut self, window: Duration) {
        self.window = window;
    }

    /// Returns `true` and records `now` when `key` has never fired or its
    /// last firing is strictly more than one window ago.
    pub fn should_fire(&mut self, key: &str, now: Instant) -> bool {
        if let Some(last) = self.last_fired.get(key) {
            if now.saturating_duration_since(*last) <= self.window {
                log::debug!("Alert '{}' suppressed by cooldown", key);
                return false;
            }
        }
        self.last_fired.insert(key.to_string(), now);
        true
    }

    pub fn last_fired(&self, key: &str) -> Option<Instant> {
        self.last_fired.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.last_fired.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_fired.is_empty()
    }
}
