use reqwest::Client;

use crate::types::UserProfile;

/// Fetches the profile of the user the token belongs to.
pub async fn current_user(
    client: &Client,
    api_url: &str,
    token: &str,
) -> Result<UserProfile, reqwest::Error> {
    client
        .get(format!("{api_url}/me"))
        .bearer_auth(token)
        .send()
        .await?
        .error_for_status()?
        .json::<UserProfile>()
        .await
}
