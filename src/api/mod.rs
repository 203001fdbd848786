//! # API Module
//!
//! HTTP endpoints served by the local OAuth callback server: the `/callback`
//! route that completes the PKCE token exchange, and a `/health` probe.

mod callback;
mod health;

pub use callback::callback;
pub use health::health;
