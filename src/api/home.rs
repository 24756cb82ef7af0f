use axum::{extract::State, response::Html};

use crate::{error::Result, server::AppState, session::TokenSession};

pub async fn index(State(state): State<AppState>, session: TokenSession) -> Result<Html<String>> {
    let logged_in = session.is_logged_in().await?;
    Ok(Html(state.templates.render_login(logged_in)?))
}
