//! Page models and rendering.
//!
//! Turns the Web API payloads into the small values the two pages display and
//! renders them through [`tera`]. Templates are compiled into the binary.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use reqwest::Client;
use serde::Serialize;
use tera::{Context, Tera};

use crate::{
    spotify,
    types::{PlayHistoryItem, UserProfile},
};

/// Output format of the play timestamp.
pub const PLAYED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

const OFFSET_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%d %H:%M%:z",
];

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Renders a play timestamp as `YYYY-MM-DD HH:MM:SS UTC`.
///
/// `Z` is read as `+00:00`. Accepts ISO-8601 datetimes with seconds or
/// minute precision, an optional fraction and an optional offset, as well as
/// plain dates (midnight). The wall-clock time is printed as given; an offset
/// is not applied. Anything else, including the empty string, is returned
/// unchanged.
///
/// # Example
///
/// ```
/// assert_eq!(format_played_at("2024-01-15T10:30:00Z"), "2024-01-15 10:30:00 UTC");
/// assert_eq!(format_played_at("2024-01-15"), "2024-01-15 00:00:00 UTC");
/// assert_eq!(format_played_at("yesterday"), "yesterday");
/// ```
pub fn format_played_at(raw: &str) -> String {
    match parse_played_at(raw) {
        Some(played_at) => played_at.format(PLAYED_AT_FORMAT).to_string(),
        None => raw.to_string(),
    }
}

fn parse_played_at(raw: &str) -> Option<NaiveDateTime> {
    let normalized = raw.replace('Z', "+00:00");

    if let Ok(dt) = DateTime::parse_from_rfc3339(&normalized) {
        return Some(dt.naive_local());
    }

    OFFSET_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(&normalized, fmt).ok())
        .map(|dt| dt.naive_local())
        .or_else(|| {
            NAIVE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(&normalized, fmt).ok())
        })
        .or_else(|| {
            NaiveDate::parse_from_str(&normalized, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackView {
    pub name: String,
    /// Artist names joined with `", "`.
    pub artists: String,
    pub played_at: String,
}

impl TrackView {
    pub fn from_item(item: &PlayHistoryItem) -> Self {
        let artists = item
            .track
            .artists
            .iter()
            .map(|artist| artist.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        Self {
            name: item.track.name.clone().unwrap_or_default(),
            artists,
            played_at: item
                .played_at
                .as_deref()
                .map(format_played_at)
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserView {
    pub display_name: String,
}

impl UserView {
    /// Uses the account id when the display name is absent or null.
    pub fn from_profile(profile: UserProfile) -> Self {
        Self {
            display_name: profile.display_name.unwrap_or(profile.id),
        }
    }
}

/// Everything the recent page shows. Both parts are absent when the
/// account has no play history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RecentView {
    pub track: Option<TrackView>,
    pub user: Option<UserView>,
}

impl RecentView {
    /// Loads the newest play history entry and, if there is one, the profile.
    ///
    /// The profile is only requested when a track exists. Remote failures are
    /// returned unchanged.
    pub async fn load(client: &Client, api_url: &str, token: &str) -> Result<Self, reqwest::Error> {
        let history = spotify::player::recently_played(client, api_url, token, 1).await?;
        let Some(item) = history.items.first() else {
            return Ok(Self::default());
        };

        let track = TrackView::from_item(item);
        let profile = spotify::user::current_user(client, api_url, token).await?;

        Ok(Self {
            track: Some(track),
            user: Some(UserView::from_profile(profile)),
        })
    }
}

/// The compiled page templates.
#[derive(Debug, Clone)]
pub struct Templates {
    tera: Tera,
}

impl Templates {
    pub fn new() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            ("base.html", include_str!("../templates/base.html")),
            ("login.html", include_str!("../templates/login.html")),
            ("recent.html", include_str!("../templates/recent.html")),
        ])?;
        Ok(Self { tera })
    }

    /// Landing page; offers the login button or links for a signed in visitor.
    pub fn render_login(&self, logged_in: bool) -> Result<String, tera::Error> {
        let mut context = Context::new();
        context.insert("logged_in", &logged_in);
        self.tera.render("login.html", &context)
    }

    pub fn render_recent(&self, view: &RecentView) -> Result<String, tera::Error> {
        let mut context = Context::new();
        context.insert("track", &view.track);
        context.insert("user", &view.user);
        self.tera.render("recent.html", &context)
    }
}
