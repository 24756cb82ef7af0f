use chrono::Utc;
use reqwest::{Client, Url};

use crate::{
    config::{Config, SCOPE},
    error::AppError,
    types::{TokenErrorResponse, TokenInfo, TokenResponse},
};

/// Builds the Spotify authorization URL the visitor is redirected to.
///
/// The query carries the client id, the registered redirect URI and the fixed
/// [`SCOPE`]; all values are percent-encoded.
///
/// # Example
///
/// ```
/// let url = authorize_url(&config);
/// // https://accounts.spotify.com/authorize?client_id=...&response_type=code&...
/// ```
pub fn authorize_url(config: &Config) -> Url {
    let mut url = config.auth_url.clone();
    url.query_pairs_mut()
        .append_pair("client_id", &config.client_id)
        .append_pair("response_type", "code")
        .append_pair("redirect_uri", &config.redirect_uri)
        .append_pair("scope", SCOPE);
    url
}

/// Exchanges an authorization code for a token bundle.
///
/// Performs the server-side `authorization_code` grant against the token
/// endpoint, authenticating with the client id and secret over HTTP Basic.
///
/// # Errors
///
/// - [`AppError::Spotify`] when the endpoint cannot be reached or the body is not JSON
/// - [`AppError::TokenExchange`] when the endpoint rejects the code
pub async fn exchange_code(client: &Client, config: &Config, code: &str) -> Result<TokenInfo, AppError> {
    let res = client
        .post(&config.token_url)
        .basic_auth(&config.client_id, Some(&config.client_secret))
        .form(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", config.redirect_uri.as_str()),
        ])
        .send()
        .await?;

    let status = res.status();
    if !status.is_success() {
        let reason = match res.json::<TokenErrorResponse>().await {
            Ok(body) => body.error_description.unwrap_or(body.error),
            Err(_) => status.to_string(),
        };
        return Err(AppError::TokenExchange(reason));
    }

    // an empty access token is kept; /recent answers it with 400
    let token: TokenResponse = res.json().await?;

    let lifetime = i64::try_from(token.expires_in).unwrap_or(i64::MAX);

    Ok(TokenInfo {
        expires_at: Utc::now().timestamp().saturating_add(lifetime),
        access_token: token.access_token,
        token_type: token.token_type,
        scope: token.scope,
        expires_in: token.expires_in,
        refresh_token: token.refresh_token,
    })
}
