// Core business logic module

pub mod config;
pub mod export;
pub mod logstore;
pub mod monitor;
pub mod query;
pub mod stats;

// Re-export commonly used items
pub use config::Settings;
pub use logstore::{LiveTail, LogEntry, LogStore};
pub use monitor::MonitorRuntime;
pub use query::{query, QueryResult, Resolution};
pub use stats::Summary;
