//! # Spotify Integration Module
//!
//! This module provides the interface to the Spotify Web API used by the
//! sync pipeline: OAuth 2.0 PKCE authentication, saved-track listing, and
//! playlist management. It abstracts HTTP communication, throttling retries
//! and API quirks behind a small set of async functions.
//!
//! ## Architecture
//!
//! ```text
//! Sync Engine / CLI
//!          ↓
//! Catalog Gateway (crate::catalog)
//!          ↓
//! Spotify Integration Layer
//!     ├── Authentication (OAuth 2.0 PKCE)
//!     ├── Saved Tracks (paginated listing)
//!     └── Playlist Operations (list, create, tracks, add)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//! ```
//!
//! ## Throttling and Error Handling
//!
//! Every request goes through a shared helper that implements the catalog's
//! error taxonomy:
//!
//! - **429 Too Many Requests** - sleeps for the server-provided `Retry-After`
//!   hint (or a default) and retries transparently, up to a bounded number
//!   of attempts; exhausting the bound abandons the item like a 403.
//! - **403 Forbidden / 404 Not Found** - the item is unavailable (region
//!   lock, missing scope, deleted resource); the call yields `None` so the
//!   caller can skip it instead of failing the whole run.
//! - **Any other error status** - propagated to the caller and treated as
//!   fatal by the sync engine.
//!
//! ## API Coverage
//!
//! - `GET /me/tracks` - saved tracks with pagination
//! - `GET /me/playlists` - user playlists with pagination
//! - `POST /users/{user_id}/playlists` - create a private playlist
//! - `GET /playlists/{id}/tracks` - playlist contents with pagination
//! - `POST /playlists/{id}/tracks` - batched track insertion
//! - `POST /api/token` - token exchange and refresh

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::Serialize;
use tokio::time::sleep;

use crate::warning;

pub mod auth;
pub mod playlist;
pub mod tracks;

/// Fallback wait when a 429 response carries no usable Retry-After header.
const DEFAULT_RETRY_AFTER_SECS: u64 = 30;

/// Attempt bound for throttled requests. A persistently throttling endpoint
/// must not stall the run forever; after this many 429 answers the item is
/// abandoned like a 403.
const MAX_THROTTLE_ATTEMPTS: u32 = 10;

fn retry_after_secs(response: &Response) -> u64 {
    response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(DEFAULT_RETRY_AFTER_SECS)
}

/// Issues a bearer-authenticated GET against the Spotify API.
///
/// Retries on 429 after sleeping for the Retry-After hint, giving up with
/// `Ok(None)` once [`MAX_THROTTLE_ATTEMPTS`] is reached. Returns `Ok(None)`
/// on 403 or 404 (item unavailable or gone, caller skips). Every other
/// error status propagates as `Err`.
pub(crate) async fn get_with_retry(
    token: &str,
    url: &str,
) -> Result<Option<Response>, reqwest::Error> {
    let mut attempts = 0;

    loop {
        let client = Client::new();
        let response = client.get(url).bearer_auth(token).send().await?;

        match response.status() {
            StatusCode::TOO_MANY_REQUESTS => {
                attempts += 1;
                if attempts >= MAX_THROTTLE_ATTEMPTS {
                    warning!("Spotify keeps throttling {}. Giving up on it.", url);
                    return Ok(None);
                }
                let secs = retry_after_secs(&response);
                warning!("Spotify rate limit hit. Retrying in {}s...", secs);
                sleep(Duration::from_secs(secs)).await;
                continue; // retry
            }
            StatusCode::FORBIDDEN | StatusCode::NOT_FOUND => {
                warning!("{} for {}. Skipping...", response.status(), url);
                return Ok(None);
            }
            _ => return response.error_for_status().map(Some),
        }
    }
}

/// Issues a bearer-authenticated JSON POST against the Spotify API.
///
/// Same throttling bound and skip semantics as [`get_with_retry`].
pub(crate) async fn post_with_retry<B: Serialize>(
    token: &str,
    url: &str,
    body: &B,
) -> Result<Option<Response>, reqwest::Error> {
    let mut attempts = 0;

    loop {
        let client = Client::new();
        let response = client.post(url).bearer_auth(token).json(body).send().await?;

        match response.status() {
            StatusCode::TOO_MANY_REQUESTS => {
                attempts += 1;
                if attempts >= MAX_THROTTLE_ATTEMPTS {
                    warning!("Spotify keeps throttling {}. Giving up on it.", url);
                    return Ok(None);
                }
                let secs = retry_after_secs(&response);
                warning!("Spotify rate limit hit. Retrying in {}s...", secs);
                sleep(Duration::from_secs(secs)).await;
                continue; // retry
            }
            StatusCode::FORBIDDEN | StatusCode::NOT_FOUND => {
                warning!("{} for {}. Skipping...", response.status(), url);
                return Ok(None);
            }
            _ => return response.error_for_status().map(Some),
        }
    }
}
