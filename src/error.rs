//! Request-level errors.
//!
//! [`AppError`] covers everything a handler can fail with and decides the
//! status code and body the visitor sees.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::warning;

#[derive(Error, Debug)]
pub enum AppError {
    /// The provider sent the visitor back with `error` instead of `code`.
    #[error("Error during login: {0}")]
    AuthorizationDenied(String),
    #[error("Missing access token.")]
    MissingAccessToken,
    #[error("Token exchange failed: {0}")]
    TokenExchange(String),
    #[error("Spotify request failed: {0}")]
    Spotify(#[from] reqwest::Error),
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),
    #[error("Template error: {0}")]
    Template(#[from] tera::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::AuthorizationDenied(_) | AppError::MissingAccessToken => {
                StatusCode::BAD_REQUEST
            }
            AppError::TokenExchange(_)
            | AppError::Spotify(_)
            | AppError::Session(_)
            | AppError::Template(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = if status.is_server_error() {
            warning!("{}", self);
            "Internal Server Error".to_string()
        } else {
            self.to_string()
        };

        (status, body).into_response()
    }
}
