//! # CLI Module
//!
//! User-facing command implementations. Each command wires together the
//! token manager, the catalog gateway and the tempo resolution pipeline,
//! handles user feedback and turns unrecoverable failures into a clean
//! process exit.
//!
//! ## Commands
//!
//! - [`auth`] - Spotify OAuth authentication flow (PKCE)
//! - [`sync`] - sort all liked tracks into `BPM {n}` playlists
//! - [`tracks`] - list liked tracks, optionally with their resolved tempo
//!
//! ## Typical usage
//!
//! ```bash
//! bpmsort auth                  # authenticate with Spotify once
//! bpmsort tracks --limit 10     # sanity-check what the sync will see
//! bpmsort sync                  # create/update the BPM playlists
//! bpmsort sync --skip-unresolved
//! ```

mod auth;
mod sync;
mod tracks;

pub use auth::auth;
pub use sync::sync;
pub use tracks::tracks;
