//! Configuration management for the BPM playlist sorter.
//!
//! This module handles loading and accessing configuration values from
//! environment variables and `.env` files. Spotify credentials and endpoints
//! are required and must be set; the MusicBrainz and AcousticBrainz endpoints
//! ship with working defaults and are only overridden for testing or when
//! pointing at a mirror.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (where applicable)

use dotenv;
use std::{env, path::PathBuf};

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the necessary directory structure if it doesn't exist and loads
/// environment variables from `bpmsort/.env` in the platform-specific local
/// data directory. A missing `.env` file is not an error; in that case the
/// process environment alone is used.
pub async fn load_env() -> Result<(), String> {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("bpmsort/.env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(path).map_err(|e| e.to_string())?;
    }
    Ok(())
}

/// Returns the server address for the local OAuth callback server.
///
/// # Panics
///
/// Panics if the `SERVER_ADDRESS` environment variable is not set.
pub fn server_addr() -> String {
    env::var("SERVER_ADDRESS").expect("SERVER_ADDRESS must be set")
}

/// Returns the Spotify user ID owning the BPM playlists.
///
/// # Panics
///
/// Panics if the `SPOTIFY_USER_ID` environment variable is not set.
pub fn spotify_user() -> String {
    env::var("SPOTIFY_USER_ID").expect("SPOTIFY_USER_ID must be set")
}

/// Returns the Spotify API client ID for authentication.
///
/// # Panics
///
/// Panics if the `SPOTIFY_API_AUTH_CLIENT_ID` environment variable is not set.
pub fn spotify_client_id() -> String {
    env::var("SPOTIFY_API_AUTH_CLIENT_ID").expect("SPOTIFY_API_AUTH_CLIENT_ID must be set")
}

/// Returns the Spotify OAuth redirect URI.
///
/// Must match the redirect URI registered in the Spotify application settings.
///
/// # Panics
///
/// Panics if the `SPOTIFY_API_REDIRECT_URI` environment variable is not set.
pub fn spotify_redirect_uri() -> String {
    env::var("SPOTIFY_API_REDIRECT_URI").expect("SPOTIFY_API_REDIRECT_URI must be set")
}

/// Returns the Spotify API scope permissions requested during OAuth.
///
/// The sync pipeline needs at least `user-library-read`,
/// `playlist-read-private`, `playlist-modify-private` and
/// `playlist-modify-public`.
///
/// # Panics
///
/// Panics if the `SPOTIFY_API_AUTH_SCOPE` environment variable is not set.
pub fn spotify_scope() -> String {
    env::var("SPOTIFY_API_AUTH_SCOPE").expect("SPOTIFY_API_AUTH_SCOPE must be set")
}

/// Returns the Spotify OAuth authorization URL.
///
/// # Panics
///
/// Panics if the `SPOTIFY_API_AUTH_URL` environment variable is not set.
pub fn spotify_apiauth_url() -> String {
    env::var("SPOTIFY_API_AUTH_URL").expect("SPOTIFY_API_AUTH_URL must be set")
}

/// Returns the Spotify Web API base URL.
///
/// # Panics
///
/// Panics if the `SPOTIFY_API_URL` environment variable is not set.
pub fn spotify_apiurl() -> String {
    env::var("SPOTIFY_API_URL").expect("SPOTIFY_API_URL must be set")
}

/// Returns the Spotify OAuth token exchange URL.
///
/// # Panics
///
/// Panics if the `SPOTIFY_API_TOKEN_URL` environment variable is not set.
pub fn spotify_apitoken_url() -> String {
    env::var("SPOTIFY_API_TOKEN_URL").expect("SPOTIFY_API_TOKEN_URL must be set")
}

/// Returns the MusicBrainz recording search endpoint.
///
/// Defaults to the public MusicBrainz web service; override with
/// `MUSICBRAINZ_API_URL` (used by the tests to point at a local stub).
pub fn musicbrainz_apiurl() -> String {
    env::var("MUSICBRAINZ_API_URL")
        .unwrap_or_else(|_| "https://musicbrainz.org/ws/2/recording/".to_string())
}

/// Returns the AcousticBrainz API base URL.
///
/// Defaults to the public AcousticBrainz service; override with
/// `ACOUSTICBRAINZ_API_URL`.
pub fn acousticbrainz_apiurl() -> String {
    env::var("ACOUSTICBRAINZ_API_URL")
        .unwrap_or_else(|_| "https://acousticbrainz.org/api/v1".to_string())
}

/// Returns the User-Agent string sent to the rate-limited metadata services.
///
/// MusicBrainz etiquette asks clients to identify themselves with a name,
/// version and contact address. The contact defaults to the crate repository
/// and can be overridden with `BPMSORT_CONTACT`.
pub fn user_agent() -> String {
    let contact = env::var("BPMSORT_CONTACT")
        .unwrap_or_else(|_| "https://crates.io/crates/bpmsort".to_string());
    format!(
        "{}/{} ({})",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        contact
    )
}
