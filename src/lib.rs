// Thermolog Library - Public API

// Re-export error types
pub mod error;
pub use error::{Result, ThermologError};

// Module declarations
pub mod commands;
pub mod core;
pub mod platform;
pub mod ui;

// Re-export commonly used types
pub use core::config::Settings;

// Initialize logging, `info` unless RUST_LOG says otherwise
pub fn init_logging() {
    logger_builder(env_logger::Env::default()).init();
}

fn logger_builder(env: env_logger::Env<'_>) -> env_logger::Builder {
    env_logger::Builder::from_env(env.default_filter_or("info"))
}
