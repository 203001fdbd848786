//! BPM Playlist Sorter Library
//!
//! This library sorts a user's liked Spotify tracks into playlists grouped by
//! tempo. Tempo is resolved by cross-referencing three services: the Spotify
//! Web API (saved tracks and playlist management), MusicBrainz (title/artist/
//! album to canonical recording id) and AcousticBrainz (recording id to
//! measured BPM).
//!
//! # Modules
//!
//! - `acousticbrainz` - Tempo lookup against the AcousticBrainz low-level API
//! - `api` - HTTP API endpoints for the local OAuth callback server
//! - `catalog` - Catalog gateway trait and its Spotify implementation
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `engine` - The sync engine orchestrating the full pipeline
//! - `fetch` - Rate-limited HTTP fetcher with bounded retries
//! - `index` - Bucket-to-playlist index and name classification
//! - `management` - Token persistence and refresh
//! - `musicbrainz` - Query construction and recording id resolution
//! - `server` - Local HTTP server for OAuth callbacks
//! - `spotify` - Spotify Web API client implementation
//! - `types` - Data structures and type definitions
//! - `utils` - PKCE helpers

pub mod acousticbrainz;
pub mod api;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod engine;
pub mod fetch;
pub mod index;
pub mod management;
pub mod musicbrainz;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

/// A convenient Result type alias for operations that may fail.
///
/// Uses a boxed dynamic error trait object with Send + Sync bounds so it can
/// cross async boundaries. Used throughout the crate wherever more than one
/// error source can surface from a single operation.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
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

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only for unrecoverable errors: the process terminates with exit code 1
/// immediately after the message is printed.
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
