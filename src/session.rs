//! Typed access to the visitor's session.
//!
//! Handlers never touch the raw [`Session`]; they receive a [`TokenSession`]
//! which only knows how to read, store and drop the token bundle.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
};
use sha2::{Digest, Sha512};
use tower_sessions::{Session, cookie::Key, session};

use crate::types::TokenInfo;

/// Session key under which the token bundle is stored.
pub const TOKEN_INFO_KEY: &str = "token_info";

pub const SESSION_COOKIE_NAME: &str = "spotistat.sid";

/// Derives the 64 byte cookie signing key from the configured secret.
pub fn signing_key(secret: &str) -> Key {
    let digest = Sha512::digest(secret.as_bytes());
    Key::from(digest.as_slice())
}

/// Request-scoped handle on the session cookie.
pub struct TokenSession(Session);

impl<S> FromRequestParts<S> for TokenSession
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Session::from_request_parts(parts, state).await.map(Self)
    }
}

impl TokenSession {
    pub async fn token_info(&self) -> Result<Option<TokenInfo>, session::Error> {
        self.0.get::<TokenInfo>(TOKEN_INFO_KEY).await
    }

    pub async fn is_logged_in(&self) -> Result<bool, session::Error> {
        Ok(self.token_info().await?.is_some())
    }

    /// Stores the bundle under a fresh session id.
    pub async fn store_token_info(&self, token_info: &TokenInfo) -> Result<(), session::Error> {
        self.0.cycle_id().await?;
        self.0.insert(TOKEN_INFO_KEY, token_info).await
    }

    /// Drops everything in the session and deletes it from the store.
    pub async fn clear(&self) -> Result<(), session::Error> {
        self.0.flush().await
    }
}
