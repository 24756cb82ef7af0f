use axum::{
    extract::{Query, State},
    response::Response,
};
use serde::Deserialize;

use crate::{
    api::found,
    error::{AppError, Result},
    info,
    server::AppState,
    session::TokenSession,
    spotify, success, warning,
};

const DEFAULT_DENIAL: &str = "Authorization failed";

#[derive(Debug, Default, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub error: Option<String>,
}

/// Sends the visitor to the Spotify authorization page.
pub async fn login(State(state): State<AppState>) -> Response {
    let url = spotify::auth::authorize_url(&state.config);
    found(url.as_str())
}

/// Completes the authorization code flow.
///
/// A `code` is exchanged for a token bundle which is stored in the session
/// before redirecting to `/recent`. Without a `code` parameter the provider's `error`
/// is reported back with `400` and no exchange is attempted.
pub async fn callback(
    State(state): State<AppState>,
    session: TokenSession,
    Query(params): Query<CallbackParams>,
) -> Result<Response> {
    // an empty code is still sent; the token endpoint rejects it
    let Some(code) = params.code else {
        let reason = params.error.unwrap_or_else(|| DEFAULT_DENIAL.to_string());
        warning!("Authorization was not granted: {}", reason);
        return Err(AppError::AuthorizationDenied(reason));
    };

    let token_info = spotify::auth::exchange_code(&state.http, &state.config, &code).await?;
    session.store_token_info(&token_info).await?;

    success!("Signed in, token valid for {}s", token_info.expires_in);
    Ok(found("/recent"))
}

pub async fn logout(session: TokenSession) -> Result<Response> {
    session.clear().await?;
    info!("Signed out");
    Ok(found("/"))
}
