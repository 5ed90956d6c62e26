use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tokio::time::sleep;

use crate::{
    services::ApiError,
    types::{PlaylistItem, PlaylistItemsPage, PlaylistsPage, Track},
    warning,
};

const MAX_ATTEMPTS: u32 = 5;
const MAX_RETRY_AFTER_SECS: u64 = 120;

/// Performs an authenticated GET and decodes the JSON body.
///
/// # Retry Logic
///
/// - 502 Bad Gateway: waits 10 seconds and retries
/// - 429 Too Many Requests: waits for `Retry-After` when it is at most 120
///   seconds, otherwise gives up with [`ApiError::RateLimited`]
///
/// At most five attempts are made; every other error status is returned
/// immediately.
pub async fn get_json<T: DeserializeOwned>(
    client: &Client,
    url: &str,
    token: &str,
) -> Result<T, ApiError> {
    let mut attempt = 0;

    loop {
        attempt += 1;
        let response = client.get(url).bearer_auth(token).send().await?;
        let status = response.status();

        if status == StatusCode::BAD_GATEWAY && attempt < MAX_ATTEMPTS {
            sleep(Duration::from_secs(10)).await;
            continue; // retry
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(1);
            if retry_after > MAX_RETRY_AFTER_SECS || attempt >= MAX_ATTEMPTS {
                warning!(
                    "Retry after has reached an abnormal high of {} seconds.",
                    retry_after
                );
                return Err(ApiError::RateLimited(retry_after));
            }
            sleep(Duration::from_secs(retry_after)).await;
            continue;
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                service: "Spotify",
                status: status.as_u16(),
                body,
            });
        }

        return Ok(response.json::<T>().await?);
    }
}

/// Fetches one page of the current user's playlists.
///
/// # Arguments
///
/// * `client` - HTTP client
/// * `api_url` - Web API base URL, without trailing slash
/// * `token` - Valid access token
/// * `limit` - Page size, at most 50
/// * `offset` - Index of the first playlist on the page
///
/// # Returns
///
/// Returns a `Result` containing:
/// - `Ok(PlaylistsPage)` - The page; `next` is `None` on the last one
/// - `Err(ApiError)` - The request failed after retries
///
/// # Example
///
/// ```
/// let page = get_playlists_page(&client, API_URL, &token, 50, 0).await?;
/// for playlist in page.items.into_iter().flatten() {
///     println!("{}", playlist.name);
/// }
/// ```
pub async fn get_playlists_page(
    client: &Client,
    api_url: &str,
    token: &str,
    limit: u32,
    offset: u32,
) -> Result<PlaylistsPage, ApiError> {
    let url = format!(
        "{uri}/me/playlists?limit={limit}&offset={offset}",
        uri = api_url,
        limit = limit,
        offset = offset
    );
    get_json(client, &url, token).await
}

/// URL of the first tracks page of a playlist. Later pages are requested
/// through the `next` URL Spotify returns.
///
/// # Example
///
/// ```
/// assert_eq!(
///     tracks_url("https://api.spotify.com/v1", "abc", 100),
///     "https://api.spotify.com/v1/playlists/abc/tracks?limit=100&additional_types=track"
/// );
/// ```
pub fn tracks_url(api_url: &str, playlist_id: &str, limit: u32) -> String {
    format!(
        "{uri}/playlists/{id}/tracks?limit={limit}&additional_types=track",
        uri = api_url,
        id = playlist_id,
        limit = limit
    )
}

/// Fetches one page of playlist items from an absolute URL.
///
/// # Arguments
///
/// * `client` - HTTP client
/// * `url` - Either [`tracks_url`] or the `next` URL of the previous page
/// * `token` - Valid access token
pub async fn get_tracks_page(
    client: &Client,
    url: &str,
    token: &str,
) -> Result<PlaylistItemsPage, ApiError> {
    get_json(client, url, token).await
}

/// Converts playlist items to exported tracks, skipping removed or
/// unavailable entries which Spotify reports with a null track.
pub fn tracks_from_page(items: Vec<PlaylistItem>) -> impl Iterator<Item = Track> {
    items
        .into_iter()
        .filter_map(|item| item.track)
        .map(Track::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_items_become_tracks() {
        let page: PlaylistItemsPage = serde_json::from_str(
            r#"{
                "items": [
                    {"track": {"name": "Song A", "artists": [{"name": "First"}, {"name": "Second"}],
                               "album": {"name": "Album A"}}},
                    {"track": null},
                    {"track": {"name": "Song B", "artists": [], "album": null}}
                ],
                "next": null
            }"#,
        )
        .unwrap();

        let tracks: Vec<Track> = tracks_from_page(page.items).collect();

        assert_eq!(
            tracks,
            vec![
                Track::new("Song A", "First", "Album A"),
                Track::new("Song B", "", ""),
            ]
        );
    }

    #[test]
    fn playlists_page_tolerates_null_entries() {
        let page: PlaylistsPage = serde_json::from_str(
            r#"{"items": [{"id": "1", "name": "Mix", "public": false}, null],
                "next": "https://api.spotify.com/v1/me/playlists?offset=50&limit=50"}"#,
        )
        .unwrap();

        assert_eq!(page.items.into_iter().flatten().count(), 1);
        assert!(page.next.is_some());
    }

    #[test]
    fn tracks_url_requests_tracks_only() {
        assert_eq!(
            tracks_url("https://api.spotify.com/v1", "abc", 100),
            "https://api.spotify.com/v1/playlists/abc/tracks?limit=100&additional_types=track"
        );
    }
}
