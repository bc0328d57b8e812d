// Terminal status messages

use colored::Colorize;

/// Display a warning message
pub fn warn(message: &str) {
    println!("{}", format!("⚠️  Warning: {}", message).yellow().bold());
}

/// Display a success message
pub fn success(message: &str) {
    println!("{}", message.green().bold());
}

/// Display a dimmed/secondary message
pub fn dimmed(message: &str) {
    println!("{}", message.dimmed());
}
