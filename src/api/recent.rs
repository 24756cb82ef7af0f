use axum::{
    extract::State,
    response::{Html, IntoResponse, Response},
};

use crate::{
    api::found,
    error::{AppError, Result},
    server::AppState,
    session::TokenSession,
    view::RecentView,
};

/// Shows the most recently played track of the signed in visitor.
///
/// Without a token bundle in the session the visitor is sent back to `/`.
/// A bundle without an access token is answered with `400`.
pub async fn recent(State(state): State<AppState>, session: TokenSession) -> Result<Response> {
    let Some(token_info) = session.token_info().await? else {
        return Ok(found("/"));
    };

    if token_info.access_token.is_empty() {
        return Err(AppError::MissingAccessToken);
    }

    let view = RecentView::load(&state.http, &state.config.api_url, &token_info.access_token).await?;
    let page = state.templates.render_recent(&view)?;

    Ok(Html(page).into_response())
}
