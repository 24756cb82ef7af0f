//! Router assembly and the listening loop.

use axum::{Router, routing::get};
use reqwest::Client;
use std::{net::SocketAddr, sync::Arc};
use tower_sessions::{
    Expiry, MemoryStore, SessionManagerLayer,
    cookie::{SameSite, time::Duration},
};

use crate::{api, config::Config, info, session, view::Templates};

/// Idle time after which a session and its token bundle are dropped.
const SESSION_IDLE_HOURS: i64 = 1;

/// Shared, read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub http: Client,
    pub templates: Arc<Templates>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, tera::Error> {
        Ok(Self {
            config: Arc::new(config),
            http: Client::new(),
            templates: Arc::new(Templates::new()?),
        })
    }
}

/// Builds the router with all routes and the session layer.
pub fn app(state: AppState) -> Router {
    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_name(session::SESSION_COOKIE_NAME)
        .with_secure(state.config.secure_cookies())
        .with_http_only(true)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(Duration::hours(SESSION_IDLE_HOURS)))
        .with_signed(session::signing_key(&state.config.secret_key));

    Router::new()
        .route("/", get(api::index))
        .route("/login", get(api::login))
        .route("/callback", get(api::callback))
        .route("/recent", get(api::recent))
        .route("/logout", get(api::logout))
        .route("/health", get(api::health))
        .layer(session_layer)
        .with_state(state)
}

/// Binds `0.0.0.0:<port>` and serves until the process is stopped.
pub async fn start_api_server(config: Config) -> crate::Res<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let state = AppState::new(config)?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app(state)).await?;
    Ok(())
}
