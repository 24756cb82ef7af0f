use reqwest::Client;

use crate::types::RecentlyPlayedResponse;

/// Fetches the user's play history, newest first.
///
/// # Arguments
///
/// * `api_url` - Web API base without trailing slash
/// * `token` - Access token with the `user-read-recently-played` scope
/// * `limit` - Number of history entries to return (1-50)
///
/// # Returns
///
/// - `Ok(RecentlyPlayedResponse)` - possibly with no items for a fresh account
/// - `Err(reqwest::Error)` - network error or non-2xx status
pub async fn recently_played(
    client: &Client,
    api_url: &str,
    token: &str,
    limit: u32,
) -> Result<RecentlyPlayedResponse, reqwest::Error> {
    let url = format!("{api_url}/me/player/recently-played");

    client
        .get(url)
        .bearer_auth(token)
        .query(&[("limit", limit)])
        .send()
        .await?
        .error_for_status()?
        .json::<RecentlyPlayedResponse>()
        .await
}
