//! # API Module
//!
//! HTTP handlers for the Spotistat web app. Each handler is a short
//! sequence over the session, the Spotify client and the templates:
//!
//! | Route | Handler | Response |
//! |---|---|---|
//! | `GET /` | [`index`] | landing page, shows whether a token is in the session |
//! | `GET /login` | [`login`] | `302` to the Spotify authorization page |
//! | `GET /callback` | [`callback`] | `302` to `/recent`, or `400` when authorization was denied |
//! | `GET /recent` | [`recent`] | last played track, `302` to `/` without a session |
//! | `GET /logout` | [`logout`] | clears the session, `302` to `/` |
//! | `GET /health` | [`health`] | JSON status and version |
//!
//! Handlers get configuration and the HTTP client through
//! [`crate::server::AppState`] and the session through
//! [`crate::session::TokenSession`]; none of them reads global state.

mod auth;
mod health;
mod home;
mod recent;

pub use auth::{CallbackParams, callback, login, logout};
pub use health::health;
pub use home::index;
pub use recent::recent;

use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

/// `302 Found` to `location`.
pub(crate) fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}
