//! # YouTube Music Integration Module
//!
//! Destination side of the migration, talking to the same `youtubei/v1` JSON
//! API the YouTube Music web client uses, authorised with an OAuth bearer
//! token from `oauth.json`.
//!
//! ## Endpoints
//!
//! - `playlist/create` - new private playlist
//! - `search` - songs-filtered catalog search
//! - `browse/edit_playlist` - batch add of video ids
//! - `browse` - playlist contents, with continuation pages
//!
//! Every request carries a `WEB_REMIX` client context. Responses are plain
//! [`serde_json::Value`] trees read through the helpers in [`parse`].
//!
//! ## Request Layer
//!
//! [`YtMusicClient`] builds request bodies and interprets responses. Sending
//! them is delegated to an [`InnertubeTransport`]; [`HttpTransport`] is the
//! production one and owns the HTTP client and the OAuth token.

pub mod parse;

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, header};
use serde_json::{Value, json};
use thiserror::Error;
use tokio::sync::Mutex;

use crate::{
    config::YtMusicConfig,
    logger::SessionLog,
    management::{StoreError, YtTokenManager},
    services::{ApiError, DestinationService, TrackSearch},
};

pub const BASE_URL: &str = "https://music.youtube.com/youtubei/v1";
pub const ORIGIN: &str = "https://music.youtube.com";
pub const DEFAULT_DESCRIPTION: &str = "Imported from Spotify";
/// Search params selecting the "Songs" filter.
pub const SONGS_FILTER: &str = "EgWKAQIIAWoMEA4QChADEAQQCRAF";
/// Upper bound on the ids read back from one playlist.
pub const PLAYLIST_FETCH_LIMIT: usize = 5000;

const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:88.0) Gecko/20100101 Firefox/88.0";

#[derive(Debug, Error)]
pub enum ConnectError {
    #[error(
        "missing or unreadable '{path}' ({source}). Create it with the OAuth device flow for your YouTube client_id and client_secret"
    )]
    TokenFile { path: String, source: StoreError },
    #[error("YouTube Music authentication failed: {0}")]
    Api(#[from] ApiError),
}

/// Sends one `youtubei/v1` request and returns the decoded response body.
#[async_trait]
pub trait InnertubeTransport: Send + Sync {
    async fn post(&self, endpoint: &str, body: Value) -> Result<Value, ApiError>;
}

/// HTTPS transport against [`BASE_URL`].
///
/// Adds the client context and the browser-like headers the API expects,
/// and refreshes the OAuth token before a request when it is about to
/// expire.
pub struct HttpTransport {
    http: Client,
    base_url: String,
    tokens: Mutex<YtTokenManager>,
}

impl HttpTransport {
    pub fn new(tokens: YtTokenManager) -> Self {
        Self {
            http: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
            base_url: BASE_URL.to_string(),
            tokens: Mutex::new(tokens),
        }
    }
}

#[async_trait]
impl InnertubeTransport for HttpTransport {
    /// Posts `body` to `endpoint` with the `WEB_REMIX` context attached.
    ///
    /// # Returns
    ///
    /// Returns a `Result` containing:
    /// - `Ok(Value)` - The decoded JSON response
    /// - `Err(ApiError::Auth)` - The token could not be refreshed
    /// - `Err(ApiError::Status)` - Any non-success HTTP status, with its body
    /// - `Err(ApiError::Http)` - Network or decoding failure
    async fn post(&self, endpoint: &str, mut body: Value) -> Result<Value, ApiError> {
        let (token, token_type) = {
            let mut tokens = self.tokens.lock().await;
            let token = tokens.get_valid_token().await?;
            (token, tokens.token_type().to_string())
        };

        body["context"] = client_context();

        let response = self
            .http
            .post(format!(
                "{}/{}?alt=json&prettyPrint=false",
                self.base_url, endpoint
            ))
            .header(header::USER_AGENT, USER_AGENT)
            .header(header::ACCEPT, "*/*")
            .header(header::ORIGIN, ORIGIN)
            .header("X-Origin", ORIGIN)
            .header("X-Goog-Request-Time", Utc::now().timestamp().to_string())
            .header(header::AUTHORIZATION, format!("{} {}", token_type, token))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                service: "YouTube Music",
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<Value>().await?)
    }
}

/// YouTube Music client implementing [`DestinationService`].
pub struct YtMusicClient<T = HttpTransport> {
    transport: T,
}

impl YtMusicClient {
    /// Creates a client over HTTPS using the given OAuth token.
    ///
    /// The token is not checked here; use [`YtMusicClient::connect`] to fail
    /// early on an unusable token file.
    pub fn new(tokens: YtTokenManager) -> Self {
        Self::with_transport(HttpTransport::new(tokens))
    }

    /// Loads the OAuth token file and makes sure a valid access token can be
    /// obtained, refreshing it when needed.
    ///
    /// # Arguments
    ///
    /// * `config` - YouTube Music settings with the token file path and the
    ///   OAuth client credentials used for refreshing
    /// * `log` - Session log for progress messages
    ///
    /// # Returns
    ///
    /// Returns a `Result` containing:
    /// - `Ok(YtMusicClient)` - A client with a usable token
    /// - `Err(ConnectError::TokenFile)` - `oauth.json` is missing or malformed
    /// - `Err(ConnectError::Api)` - The expired token could not be refreshed
    ///
    /// # Example
    ///
    /// ```
    /// let ytmusic = YtMusicClient::connect(&config.ytmusic, &log).await?;
    /// let id = ytmusic.create_playlist("Road Trip", DEFAULT_DESCRIPTION).await?;
    /// ```
    pub async fn connect(config: &YtMusicConfig, log: &SessionLog) -> Result<Self, ConnectError> {
        log.info("Authenticating with YouTube Music...");

        let tokens =
            YtTokenManager::load(config)
                .await
                .map_err(|source| ConnectError::TokenFile {
                    path: config.oauth_file.display().to_string(),
                    source,
                })?;

        let client = Self::new(tokens);
        client.transport.tokens.lock().await.get_valid_token().await?;

        log.success("Successfully authenticated with YouTube Music");
        Ok(client)
    }
}

impl<T: InnertubeTransport> YtMusicClient<T> {
    pub fn with_transport(transport: T) -> Self {
        Self { transport }
    }
}

fn client_context() -> Value {
    json!({
        "client": {
            "clientName": "WEB_REMIX",
            "clientVersion": format!("1.{}.01.00", Utc::now().format("%Y%m%d")),
            "hl": "en"
        },
        "user": {}
    })
}

/// Builds the catalog search query for a track: title and artist joined by a
/// space, trimmed when the artist is empty.
///
/// # Example
///
/// ```
/// assert_eq!(search_query("Hey Jude", "The Beatles"), "Hey Jude The Beatles");
/// assert_eq!(search_query("Untitled", ""), "Untitled");
/// ```
pub fn search_query(title: &str, artist: &str) -> String {
    format!("{} {}", title, artist).trim().to_string()
}

/// One `ACTION_ADD_VIDEO` per id. Duplicates are kept.
pub fn add_actions(track_ids: &[String]) -> Vec<Value> {
    track_ids
        .iter()
        .map(|id| {
            json!({
                "action": "ACTION_ADD_VIDEO",
                "addedVideoId": id,
                "dedupeOption": "DEDUPE_OPTION_SKIP"
            })
        })
        .collect()
}

#[async_trait]
impl<T: InnertubeTransport> TrackSearch for YtMusicClient<T> {
    /// Searches the catalog with the songs filter and returns the first
    /// song's video id.
    ///
    /// # Returns
    ///
    /// Returns a `Result` containing:
    /// - `Ok(Some(String))` - Video id of the top song result
    /// - `Ok(None)` - The search returned no songs
    /// - `Err(ApiError)` - The request failed
    async fn search_track(&self, title: &str, artist: &str) -> Result<Option<String>, ApiError> {
        let response = self
            .transport
            .post(
                "search",
                json!({ "query": search_query(title, artist), "params": SONGS_FILTER }),
            )
            .await?;

        Ok(parse::first_search_video_id(&response))
    }
}

#[async_trait]
impl<T: InnertubeTransport> DestinationService for YtMusicClient<T> {
    /// Creates a new private playlist.
    ///
    /// # Returns
    ///
    /// Returns a `Result` containing:
    /// - `Ok(String)` - The new playlist's id, without the `VL` prefix
    /// - `Err(ApiError::Unexpected)` - The response carried no `playlistId`
    /// - `Err(ApiError)` - The request failed
    async fn create_playlist(&self, name: &str, description: &str) -> Result<String, ApiError> {
        let response = self
            .transport
            .post(
                "playlist/create",
                json!({
                    "title": name,
                    "description": description,
                    "privacyStatus": "PRIVATE"
                }),
            )
            .await?;

        response["playlistId"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| ApiError::Unexpected("playlist/create returned no playlistId".into()))
    }

    /// Adds all ids in a single `browse/edit_playlist` call.
    ///
    /// The call is not retried. Any response status other than
    /// `STATUS_SUCCEEDED` is returned as [`ApiError::Unexpected`].
    async fn add_tracks(&self, playlist_id: &str, track_ids: &[String]) -> Result<(), ApiError> {
        let response = self
            .transport
            .post(
                "browse/edit_playlist",
                json!({ "playlistId": playlist_id, "actions": add_actions(track_ids) }),
            )
            .await?;

        match response["status"].as_str() {
            Some("STATUS_SUCCEEDED") => Ok(()),
            other => Err(ApiError::Unexpected(format!(
                "edit_playlist status {}",
                other.unwrap_or("missing")
            ))),
        }
    }

    /// Reads back the video ids currently in a playlist, in playlist order.
    ///
    /// # Pagination
    ///
    /// The first page is requested with the `VL`-prefixed browse id. Further
    /// pages are requested with the continuation token of the previous page
    /// until no token is left, a page comes back empty, or
    /// [`PLAYLIST_FETCH_LIMIT`] ids have been read. The result is truncated
    /// to that limit.
    ///
    /// # Example
    ///
    /// ```
    /// let ids = ytmusic.playlist_track_ids("PLabc").await?;
    /// println!("{} tracks on the destination", ids.len());
    /// ```
    async fn playlist_track_ids(&self, playlist_id: &str) -> Result<Vec<String>, ApiError> {
        let browse_id = if playlist_id.starts_with("VL") {
            playlist_id.to_string()
        } else {
            format!("VL{}", playlist_id)
        };

        let mut response = self
            .transport
            .post("browse", json!({ "browseId": browse_id }))
            .await?;
        let mut ids = parse::playlist_video_ids(&response);

        while ids.len() < PLAYLIST_FETCH_LIMIT {
            let Some(token) = parse::continuation_token(&response) else {
                break;
            };
            response = self
                .transport
                .post("browse", json!({ "continuation": token }))
                .await?;
            let page = parse::playlist_video_ids(&response);
            if page.is_empty() {
                break;
            }
            ids.extend(page);
        }

        ids.truncate(PLAYLIST_FETCH_LIMIT);
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::VecDeque, sync::Mutex as StdMutex};

    use super::*;

    /// Replays canned responses in order and records every request.
    #[derive(Default)]
    struct ScriptedTransport {
        responses: StdMutex<VecDeque<Value>>,
        requests: StdMutex<Vec<(String, Value)>>,
    }

    impl ScriptedTransport {
        fn replying(responses: Vec<Value>) -> Self {
            Self {
                responses: StdMutex::new(responses.into()),
                ..Self::default()
            }
        }

        fn requests(&self) -> Vec<(String, Value)> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl InnertubeTransport for ScriptedTransport {
        async fn post(&self, endpoint: &str, body: Value) -> Result<Value, ApiError> {
            self.requests
                .lock()
                .unwrap()
                .push((endpoint.to_string(), body));
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| ApiError::Unexpected("no scripted response left".into()))
        }
    }

    fn shelf_items(ids: &[String], next: Option<&str>) -> Vec<Value> {
        let mut items: Vec<Value> = ids
            .iter()
            .map(|id| json!({"musicResponsiveListItemRenderer": {"playlistItemData": {"videoId": id}}}))
            .collect();
        if let Some(token) = next {
            items.push(json!({"continuationItemRenderer": {"continuationEndpoint": {
                "continuationCommand": {"token": token}
            }}}));
        }
        items
    }

    fn first_page(ids: &[String], next: Option<&str>) -> Value {
        json!({"contents": {"twoColumnBrowseResultsRenderer": {"secondaryContents": {
            "sectionListRenderer": {"contents": [
                {"musicPlaylistShelfRenderer": {"contents": shelf_items(ids, next)}}
            ]}
        }}}})
    }

    fn next_page(ids: &[String], next: Option<&str>) -> Value {
        json!({"onResponseReceivedActions": [{"appendContinuationItemsAction": {
            "continuationItems": shelf_items(ids, next)
        }}]})
    }

    fn video_ids(prefix: &str, n: usize) -> Vec<String> {
        (0..n).map(|i| format!("{prefix}{i}")).collect()
    }

    #[test]
    fn query_joins_title_and_artist() {
        assert_eq!(search_query("Hey Jude", "The Beatles"), "Hey Jude The Beatles");
        assert_eq!(search_query("Untitled", ""), "Untitled");
    }

    #[test]
    fn add_actions_keep_duplicates_and_order() {
        let actions = add_actions(&["a".to_string(), "b".to_string(), "a".to_string()]);

        assert_eq!(actions.len(), 3);
        assert_eq!(actions[0]["addedVideoId"], "a");
        assert_eq!(actions[2]["addedVideoId"], "a");
        assert_eq!(actions[1]["action"], "ACTION_ADD_VIDEO");
    }

    #[test]
    fn context_targets_web_remix_client() {
        let context = client_context();
        assert_eq!(context["client"]["clientName"], "WEB_REMIX");
        assert!(context["client"]["clientVersion"]
            .as_str()
            .unwrap()
            .starts_with("1.20"));
    }

    #[tokio::test]
    async fn playlist_read_follows_continuations() {
        let client = YtMusicClient::with_transport(ScriptedTransport::replying(vec![
            first_page(&video_ids("a", 2), Some("tok1")),
            next_page(&video_ids("b", 2), Some("tok2")),
            next_page(&video_ids("c", 1), None),
        ]));

        let ids = client.playlist_track_ids("PL123").await.unwrap();

        assert_eq!(ids, vec!["a0", "a1", "b0", "b1", "c0"]);
        let requests = client.transport.requests();
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[0].0, "browse");
        assert_eq!(requests[0].1["browseId"], "VLPL123");
        assert_eq!(requests[1].1["continuation"], "tok1");
        assert_eq!(requests[2].1["continuation"], "tok2");
    }

    #[tokio::test]
    async fn playlist_read_stops_at_fetch_limit() {
        let client = YtMusicClient::with_transport(ScriptedTransport::replying(vec![
            first_page(&video_ids("a", 3000), Some("tok1")),
            next_page(&video_ids("b", 3000), Some("tok2")),
            next_page(&video_ids("c", 10), None),
        ]));

        let ids = client.playlist_track_ids("VLPL123").await.unwrap();

        assert_eq!(ids.len(), PLAYLIST_FETCH_LIMIT);
        assert_eq!(ids.last().map(String::as_str), Some("b1999"));
        let requests = client.transport.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].1["browseId"], "VLPL123");
    }

    #[tokio::test]
    async fn playlist_read_stops_on_empty_continuation_page() {
        let client = YtMusicClient::with_transport(ScriptedTransport::replying(vec![
            first_page(&video_ids("a", 1), Some("tok1")),
            next_page(&[], Some("tok2")),
        ]));

        let ids = client.playlist_track_ids("PL1").await.unwrap();

        assert_eq!(ids, vec!["a0"]);
        assert_eq!(client.transport.requests().len(), 2);
    }

    #[tokio::test]
    async fn add_tracks_requires_succeeded_status() {
        let client = YtMusicClient::with_transport(ScriptedTransport::replying(vec![
            json!({"status": "STATUS_SUCCEEDED"}),
            json!({"status": "STATUS_FAILED"}),
            json!({}),
        ]));
        let ids = vec!["v1".to_string(), "v1".to_string()];

        assert!(client.add_tracks("PL1", &ids).await.is_ok());
        assert!(matches!(
            client.add_tracks("PL1", &ids).await,
            Err(ApiError::Unexpected(msg)) if msg.contains("STATUS_FAILED")
        ));
        assert!(matches!(
            client.add_tracks("PL1", &ids).await,
            Err(ApiError::Unexpected(msg)) if msg.contains("missing")
        ));

        let requests = client.transport.requests();
        assert_eq!(requests[0].0, "browse/edit_playlist");
        assert_eq!(requests[0].1["playlistId"], "PL1");
        assert_eq!(requests[0].1["actions"].as_array().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn create_playlist_reads_id_and_is_private() {
        let client = YtMusicClient::with_transport(ScriptedTransport::replying(vec![
            json!({"playlistId": "PLnew"}),
            json!({"error": "nope"}),
        ]));

        assert_eq!(
            client
                .create_playlist("Road Trip", DEFAULT_DESCRIPTION)
                .await
                .unwrap(),
            "PLnew"
        );
        assert!(matches!(
            client.create_playlist("Road Trip", DEFAULT_DESCRIPTION).await,
            Err(ApiError::Unexpected(_))
        ));

        let requests = client.transport.requests();
        assert_eq!(requests[0].0, "playlist/create");
        assert_eq!(requests[0].1["privacyStatus"], "PRIVATE");
        assert_eq!(requests[0].1["description"], "Imported from Spotify");
    }

    #[tokio::test]
    async fn search_sends_songs_filter_and_takes_first_song() {
        let client = YtMusicClient::with_transport(ScriptedTransport::replying(vec![json!({
            "musicShelfRenderer": {"contents": shelf_items(&video_ids("s", 2), None)}
        })]));

        let found = client.search_track("Hey Jude", "The Beatles").await.unwrap();

        assert_eq!(found.as_deref(), Some("s0"));
        let requests = client.transport.requests();
        assert_eq!(requests[0].0, "search");
        assert_eq!(requests[0].1["query"], "Hey Jude The Beatles");
        assert_eq!(requests[0].1["params"], SONGS_FILTER);
    }
}
