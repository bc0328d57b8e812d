use std::io;
use thiserror::Error;

/// Custom error type for the thermolog library
#[derive(Error, Debug)]
pub enum ThermologError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid setting: {0}")]
    Validation(String),

    #[error("No candidate readings available")]
    NoCandidates,

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Delivery failed: {0}")]
    Delivery(String),

    #[error("System monitor error: {0}")]
    SystemMonitor(String),
}

/// Result type alias for the thermolog library
pub type Result<T> = std::result::Result<T, ThermologError>;

impl ThermologError {
    /// Create a validation error (rejected settings update)
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        ThermologError::Validation(msg.into())
    }

    pub fn parse<S: Into<String>>(msg: S) -> Self {
        ThermologError::Parse(msg.into())
    }

    pub fn delivery<S: Into<String>>(msg: S) -> Self {
        ThermologError::Delivery(msg.into())
    }

    pub fn system_monitor<S: Into<String>>(msg: S) -> Self {
        ThermologError::SystemMonitor(msg.into())
    }

    /// True for errors that only mean "nothing to show right now"
    pub fn is_no_data(&self) -> bool {
        matches!(self, ThermologError::NoCandidates)
    }
}
