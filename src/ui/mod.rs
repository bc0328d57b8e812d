// UI and formatting module

pub mod formatters;
pub mod messages;

// Re-export commonly used items for cleaner imports
pub use formatters::{
    format_entry, format_point, format_sample, format_temperature, format_time, status_colored,
};
pub use messages::{dimmed, success, warn};
