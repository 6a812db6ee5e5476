//! Spotify liked songs to YouTube Music exporter.
//!
//! This library reads a user's saved tracks from the Spotify Web API, looks
//! every track up on YouTube through `yt-dlp`, stores the resulting links in
//! a plain text file and finally creates a private YouTube Music playlist
//! from them.
//!
//! # Modules
//!
//! - `api` - HTTP endpoints for the local OAuth callback listener
//! - `cli` - Command implementations and the migration workflow
//! - `config` - Environment overrides and well-known file locations
//! - `management` - Settings, token cache, link file and prompting
//! - `server` - Local HTTP server for OAuth callbacks
//! - `spotify` - Spotify Web API client (auth and liked songs)
//! - `types` - Data structures and type definitions
//! - `utils` - Query normalization, link parsing and small helpers
//! - `youtube` - `yt-dlp` search and YouTube Music playlist client

pub mod api;
pub mod cli;
pub mod config;
pub mod management;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;
pub mod youtube;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Loading liked songs...");
/// info!("Found {} songs", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark.
///
/// Unlike a panic this does not terminate the process. Every command ends
/// with its own exit path (usually a "Press Enter" pause), so callers
/// return after reporting.
///
/// # Example
///
/// ```
/// error!("Spotify error: {}", e);
/// return;
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for recoverable issues the user should notice, such as tracks that
/// could not be matched or a playlist append that failed.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
