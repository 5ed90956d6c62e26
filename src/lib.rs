//! Playport Library
//!
//! This library migrates a user's playlists from Spotify to YouTube Music. It
//! exports the tracks of selected Spotify playlists into local JSON records,
//! then recreates each playlist on YouTube Music by searching for every track,
//! adding the matches in one batch and verifying what actually landed.
//!
//! # Modules
//!
//! - `api` - HTTP API endpoints for the local OAuth callback server
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `logger` - Console and optional file session logging
//! - `management` - Local persistence of records and tokens
//! - `migrate` - Track matching, playlist reconciliation and run summaries
//! - `server` - Local HTTP server for OAuth callbacks
//! - `services` - Traits describing the source and destination services
//! - `spotify` - Spotify Web API client (source)
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//! - `ytmusic` - YouTube Music client (destination)
//!
//! # Example
//!
//! ```
//! use playport::{config::Config, logger::SessionLog};
//!
//! #[tokio::main]
//! async fn main() -> playport::Res<()> {
//!     let config = Config::load().await?;
//!     let log = SessionLog::new(Some(config.log_file.clone()));
//!     log.info("ready");
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod logger;
pub mod management;
pub mod migrate;
pub mod server;
pub mod services;
pub mod spotify;
pub mod types;
pub mod utils;
pub mod ytmusic;

/// A convenient Result type alias for operations that may fail.
///
/// Uses a boxed dynamic error trait object with Send + Sync bounds so it can
/// cross await points and task boundaries.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Authenticating with Spotify...");
/// info!("Found {} playlists", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Saved playlist to {}", path.display());
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark.
///
/// Only prints. Terminating the process is left to the binary entry point.
///
/// # Example
///
/// ```
/// error!("Missing required environment variable: {}", var_name);
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// # Example
///
/// ```
/// warning!("No match for {} - {}", title, artist);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
