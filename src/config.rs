//! Configuration management for Spotistat.
//!
//! All settings are read once at process start into a [`Config`] value that is
//! handed to the router and the OAuth calls. Nothing inside a request handler
//! reads the environment.
//!
//! Sources, highest priority first:
//! 1. Environment variables
//! 2. `.env` in the local data directory (`spotistat/.env`)
//! 3. `.env` in the working directory
//! 4. Defaults for the optional settings

use std::{env, path::PathBuf};

use reqwest::Url;
use thiserror::Error;

use crate::warning;

/// Permissions requested from the user: recent play history and the private profile.
pub const SCOPE: &str = "user-read-recently-played user-read-private";

pub const DEFAULT_SECRET_KEY: &str = "dev-secret-change-me";
pub const DEFAULT_PORT: u16 = 8888;
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{var} is not a valid port: {value}")]
    InvalidPort { var: &'static str, value: String },
    #[error("{var} is not a valid URL ({value}): {reason}")]
    InvalidUrl {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Runtime settings for the web app.
#[derive(Debug, Clone)]
pub struct Config {
    /// Master secret the session cookie signing key is derived from.
    pub secret_key: String,
    pub client_id: String,
    pub client_secret: String,
    /// Must match a redirect URI registered for the Spotify application.
    pub redirect_uri: String,
    pub port: u16,
    pub auth_url: Url,
    pub token_url: String,
    /// Web API base, stored without a trailing slash.
    pub api_url: String,
}

/// Loads variables from the optional `.env` files.
///
/// Neither file has to exist. Variables already present in the environment
/// are never overwritten, so the data directory file wins over the one in the
/// working directory.
///
/// # Example
///
/// ```
/// spotistat::config::load_env();
/// let config = spotistat::config::Config::from_env()?;
/// ```
pub fn load_env() {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("spotistat/.env");
    if path.is_file() {
        if let Err(e) = dotenv::from_path(&path) {
            warning!("Cannot read {}: {}", path.display(), e);
        }
    }

    // a missing ./.env is normal
    let _ = dotenv::dotenv();
}

impl Config {
    /// Builds the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Fails if a Spotify credential is missing, `PORT` is not a number in
    /// range, or one of the endpoint URLs cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let secret_key = match get("SECRET_KEY") {
            Some(key) => key,
            None => {
                warning!("SECRET_KEY is not set, using an insecure development key");
                DEFAULT_SECRET_KEY.to_string()
            }
        };

        let port = match get("PORT") {
            Some(value) => value
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort { var: "PORT", value })?,
            None => DEFAULT_PORT,
        };

        let auth_url = parse_url(
            "SPOTIFY_AUTH_URL",
            get("SPOTIFY_AUTH_URL").unwrap_or_else(|| DEFAULT_AUTH_URL.to_string()),
        )?;
        let token_url = parse_url(
            "SPOTIFY_TOKEN_URL",
            get("SPOTIFY_TOKEN_URL").unwrap_or_else(|| DEFAULT_TOKEN_URL.to_string()),
        )?;
        let api_url = parse_url(
            "SPOTIFY_API_URL",
            get("SPOTIFY_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        )?;

        Ok(Self {
            secret_key,
            client_id: required("SPOTIFY_CLIENT_ID")?,
            client_secret: required("SPOTIFY_CLIENT_SECRET")?,
            redirect_uri: required("SPOTIFY_REDIRECT_URI")?,
            port,
            auth_url,
            token_url: token_url.to_string(),
            api_url: api_url.as_str().trim_end_matches('/').to_string(),
        })
    }

    /// Whether the session cookie should carry the `Secure` attribute.
    pub fn secure_cookies(&self) -> bool {
        self.redirect_uri.starts_with("https://")
    }
}

fn parse_url(var: &'static str, value: String) -> Result<Url, ConfigError> {
    Url::parse(&value).map_err(|e| ConfigError::InvalidUrl {
        var,
        reason: e.to_string(),
        value,
    })
}
