//! # Spotify Integration Module
//!
//! Thin client for the two Spotify services the app talks to:
//!
//! - [`auth`] - accounts service: building the authorization URL and trading an
//!   authorization code for a token bundle
//! - [`player`] - Web API play history (`GET /me/player/recently-played`)
//! - [`user`] - Web API profile of the signed in user (`GET /me`)
//!
//! Every call takes the shared [`reqwest::Client`] and the endpoint from
//! [`crate::config::Config`] explicitly. Responses are decoded into the typed
//! payloads in [`crate::types`]; optional fields carry defaults there so the
//! view code never indexes raw JSON.
//!
//! ## Error Handling
//!
//! Failures are returned as-is. There is no retry, backoff or token refresh:
//! an expired token shows up as a `401` from the Web API and is surfaced to
//! the visitor as a server error.

pub mod auth;
pub mod player;
pub mod user;
