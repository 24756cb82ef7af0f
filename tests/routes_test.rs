use std::{collections::HashMap, net::SocketAddr};

use axum::{
    Form, Json, Router,
    extract::Query,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use reqwest::redirect::Policy;
use serde_json::{Value, json};
use spotistat::{
    config::{Config, SCOPE},
    server::{AppState, app},
};
use tokio::net::TcpListener;

async fn spawn(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_string)
}

// Stub accounts service: the access token handed out is the code itself, so
// each test picks the Web API behavior through the code it sends.
async fn stub_token(headers: HeaderMap, Form(form): Form<HashMap<String, String>>) -> Response {
    let basic = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("Basic "));
    let grant = form.get("grant_type").map(String::as_str);
    if !basic || grant != Some("authorization_code") || !form.contains_key("redirect_uri") {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "invalid_client" }))).into_response();
    }

    match form.get("code").map(String::as_str) {
        Some("") | Some("rejected") => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_grant",
                "error_description": "Invalid authorization code"
            })),
        )
            .into_response(),
        Some("missing-token") => Json(json!({ "token_type": "Bearer", "expires_in": 3600 })).into_response(),
        Some("huge-expiry") => Json(json!({
            "access_token": "with-track",
            "token_type": "Bearer",
            "expires_in": u64::MAX
        }))
        .into_response(),
        Some(code) => Json(json!({
            "access_token": code,
            "token_type": "Bearer",
            "scope": SCOPE,
            "expires_in": 3600,
            "refresh_token": "stub-refresh"
        }))
        .into_response(),
        None => StatusCode::BAD_REQUEST.into_response(),
    }
}

async fn stub_recently_played(headers: HeaderMap, Query(query): Query<HashMap<String, String>>) -> Response {
    if query.get("limit").map(String::as_str) != Some("1") {
        return StatusCode::BAD_REQUEST.into_response();
    }

    let played_at = match bearer(&headers).as_deref() {
        None | Some("expired") => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": { "status": 401, "message": "The access token expired" } })),
            )
                .into_response();
        }
        Some("no-history") => return Json(json!({ "items": [] })).into_response(),
        Some("bad-time") => "not-a-date",
        Some(_) => "2024-01-15T10:30:00Z",
    };

    Json(json!({
        "items": [{
            "track": {
                "id": "track-1",
                "name": "Song <One>",
                "artists": [{ "name": "Artist A" }, { "name": "Artist B" }]
            },
            "played_at": played_at,
            "context": null
        }],
        "limit": 1
    }))
    .into_response()
}

async fn stub_me(headers: HeaderMap) -> Response {
    match bearer(&headers).as_deref() {
        None => StatusCode::UNAUTHORIZED.into_response(),
        Some("no-name") => Json(json!({ "id": "user-123" })).into_response(),
        Some(_) => Json(json!({ "id": "user-123", "display_name": "Test User" })).into_response(),
    }
}

fn stub_provider() -> Router {
    Router::new()
        .route("/authorize", get(|| async { "authorize" }))
        .route("/api/token", post(stub_token))
        .route("/v1/me/player/recently-played", get(stub_recently_played))
        .route("/v1/me", get(stub_me))
}

struct TestApp {
    base: String,
    provider: SocketAddr,
    http: reqwest::Client,
    cookie: Option<String>,
}

impl TestApp {
    async fn start() -> Self {
        let provider = spawn(stub_provider()).await;

        let vars: HashMap<&str, String> = HashMap::from([
            ("SECRET_KEY", "test-secret".to_string()),
            ("SPOTIFY_CLIENT_ID", "test-client".to_string()),
            ("SPOTIFY_CLIENT_SECRET", "test-client-secret".to_string()),
            ("SPOTIFY_REDIRECT_URI", "http://127.0.0.1:8888/callback".to_string()),
            ("SPOTIFY_AUTH_URL", format!("http://{provider}/authorize")),
            ("SPOTIFY_TOKEN_URL", format!("http://{provider}/api/token")),
            ("SPOTIFY_API_URL", format!("http://{provider}/v1")),
        ]);
        let config = Config::from_lookup(|key| vars.get(key).cloned()).unwrap();

        let addr = spawn(app(AppState::new(config).unwrap())).await;
        let http = reqwest::Client::builder()
            .redirect(Policy::none())
            .build()
            .unwrap();

        Self {
            base: format!("http://{addr}"),
            provider,
            http,
            cookie: None,
        }
    }

    /// Sends a GET with the current session cookie and keeps any new one.
    async fn get(&mut self, path: &str) -> reqwest::Response {
        let mut req = self.http.get(format!("{}{}", self.base, path));
        if let Some(cookie) = &self.cookie {
            req = req.header(header::COOKIE, cookie);
        }

        let res = req.send().await.unwrap();
        if let Some(set_cookie) = res.headers().get(header::SET_COOKIE) {
            let pair = set_cookie.to_str().unwrap().split(';').next().unwrap();
            // removal cookies carry an empty value; keep the old one around
            if !pair.ends_with('=') {
                self.cookie = Some(pair.to_string());
            }
        }
        res
    }

    async fn sign_in(&mut self, code: &str) {
        let res = self.get(&format!("/callback?code={code}")).await;
        assert_eq!(res.status(), StatusCode::FOUND);
        assert_eq!(location(&res), "/recent");
        assert!(self.cookie.is_some());
    }
}

fn location(res: &reqwest::Response) -> &str {
    res.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

#[tokio::test]
async fn test_landing_page_without_session() {
    let mut app = TestApp::start().await;

    let res = app.get("/").await;

    assert_eq!(res.status(), StatusCode::OK);
    let body = res.text().await.unwrap();
    assert!(body.contains("href=\"/login\""));
    assert!(!body.contains("href=\"/logout\""));
}

#[tokio::test]
async fn test_login_redirects_to_provider() {
    let mut app = TestApp::start().await;

    let res = app.get("/login").await;

    assert_eq!(res.status(), StatusCode::FOUND);
    let target = reqwest::Url::parse(location(&res)).unwrap();
    assert_eq!(
        target.as_str().split('?').next().unwrap(),
        format!("http://{}/authorize", app.provider)
    );
    let query: HashMap<String, String> = target.query_pairs().into_owned().collect();
    assert_eq!(query["client_id"], "test-client");
    assert_eq!(query["response_type"], "code");
    assert_eq!(query["redirect_uri"], "http://127.0.0.1:8888/callback");
    assert_eq!(query["scope"], "user-read-recently-played user-read-private");
}

#[tokio::test]
async fn test_recent_without_session_redirects_home() {
    let mut app = TestApp::start().await;

    let res = app.get("/recent").await;

    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), "/");
}

#[tokio::test]
async fn test_callback_with_error_is_bad_request() {
    let mut app = TestApp::start().await;

    let res = app.get("/callback?error=access_denied").await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(app.cookie.is_none());
    let body = res.text().await.unwrap();
    assert_eq!(body, "Error during login: access_denied");

    // the denied login leaves no session behind
    let res = app.get("/recent").await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), "/");
}

#[tokio::test]
async fn test_callback_without_code_or_error() {
    let mut app = TestApp::start().await;

    let res = app.get("/callback").await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.text().await.unwrap(), "Error during login: Authorization failed");
}

#[tokio::test]
async fn test_recent_shows_last_track() {
    let mut app = TestApp::start().await;
    app.sign_in("with-track").await;

    let res = app.get("/recent").await;

    assert_eq!(res.status(), StatusCode::OK);
    let body = res.text().await.unwrap();
    assert!(body.contains("Song &lt;One&gt;"));
    assert!(body.contains("Artist A, Artist B"));
    assert!(body.contains("2024-01-15 10:30:00 UTC"));
    assert!(body.contains("Hi, Test User"));
}

#[tokio::test]
async fn test_landing_page_with_session() {
    let mut app = TestApp::start().await;
    app.sign_in("with-track").await;

    let body = app.get("/").await.text().await.unwrap();

    assert!(body.contains("href=\"/recent\""));
    assert!(body.contains("href=\"/logout\""));
}

#[tokio::test]
async fn test_recent_keeps_unparseable_timestamp() {
    let mut app = TestApp::start().await;
    app.sign_in("bad-time").await;

    let body = app.get("/recent").await.text().await.unwrap();

    assert!(body.contains("Played at not-a-date"));
}

#[tokio::test]
async fn test_recent_falls_back_to_account_id() {
    let mut app = TestApp::start().await;
    app.sign_in("no-name").await;

    let body = app.get("/recent").await.text().await.unwrap();

    assert!(body.contains("Hi, user-123"));
}

#[tokio::test]
async fn test_recent_with_empty_history() {
    let mut app = TestApp::start().await;
    app.sign_in("no-history").await;

    let res = app.get("/recent").await;

    assert_eq!(res.status(), StatusCode::OK);
    let body = res.text().await.unwrap();
    assert!(body.contains("No recently played tracks found."));
    assert!(!body.contains("Hi,"));
}

#[tokio::test]
async fn test_recent_with_missing_access_token() {
    let mut app = TestApp::start().await;
    app.sign_in("missing-token").await;

    let res = app.get("/recent").await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.text().await.unwrap(), "Missing access token.");
}

#[tokio::test]
async fn test_logout_then_recent_redirects_home() {
    let mut app = TestApp::start().await;
    app.sign_in("with-track").await;
    assert_eq!(app.get("/recent").await.status(), StatusCode::OK);

    let res = app.get("/logout").await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), "/");

    // still sending the old cookie
    let res = app.get("/recent").await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), "/");
}

#[tokio::test]
async fn test_rejected_code_is_server_error() {
    let mut app = TestApp::start().await;

    let res = app.get("/callback?code=rejected").await;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(app.cookie.is_none());
}

#[tokio::test]
async fn test_empty_code_is_still_exchanged() {
    let mut app = TestApp::start().await;

    // the token endpoint refuses the empty code, so this is not a denial
    let res = app.get("/callback?code=").await;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(app.cookie.is_none());
}

#[tokio::test]
async fn test_huge_token_lifetime_is_accepted() {
    let mut app = TestApp::start().await;
    app.sign_in("huge-expiry").await;

    let res = app.get("/recent").await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_remote_failure_is_server_error() {
    let mut app = TestApp::start().await;
    app.sign_in("expired").await;

    let res = app.get("/recent").await;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_tampered_cookie_is_ignored() {
    let mut app = TestApp::start().await;
    app.sign_in("with-track").await;

    let cookie = app.cookie.clone().unwrap();
    app.cookie = Some(format!("{cookie}x"));

    let res = app.get("/recent").await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), "/");
}

#[tokio::test]
async fn test_health() {
    let mut app = TestApp::start().await;

    let res = app.get("/health").await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}
