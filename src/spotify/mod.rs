//! # Spotify Integration Module
//!
//! Source side of the migration. Implements the OAuth 2.0 PKCE login, the
//! cached-token lifecycle and the two read operations the exporter needs:
//! listing the current user's playlists and listing the tracks of one
//! playlist. Both follow Spotify's pagination until no `next` page is left.
//!
//! ## API Coverage
//!
//! - `GET /me` - confirms the session is usable
//! - `GET /me/playlists` - offset pagination, 50 per page
//! - `GET /playlists/{id}/tracks` - `next`-URL pagination, 100 per page
//! - `POST /api/token` - code exchange and refresh
//!
//! Transient failures are retried inside [`playlists::get_json`]: 502 Bad
//! Gateway after a 10 second pause, 429 Too Many Requests after the
//! `Retry-After` delay when it is at most 120 seconds.

pub mod auth;
pub mod playlists;

use async_trait::async_trait;
use reqwest::Client;
use tokio::sync::Mutex;

use crate::{
    config::Config,
    logger::SessionLog,
    management::TokenManager,
    services::{ApiError, SourceService},
    types::{Playlist, Track},
};

pub use auth::AuthError;

pub const PLAYLISTS_PAGE_SIZE: u32 = 50;
pub const TRACKS_PAGE_SIZE: u32 = 100;

pub struct SpotifyClient {
    http: Client,
    api_url: String,
    tokens: Mutex<TokenManager>,
}

impl SpotifyClient {
    /// Creates a client for the Web API at `api_url` using a cached token.
    ///
    /// # Arguments
    ///
    /// * `api_url` - Web API base URL, e.g. `https://api.spotify.com/v1`
    /// * `tokens` - Token manager refreshing the access token on expiry
    pub fn new(api_url: impl Into<String>, tokens: TokenManager) -> Self {
        Self {
            http: Client::new(),
            api_url: api_url.into(),
            tokens: Mutex::new(tokens),
        }
    }

    /// Builds an authenticated client from the cached token, running the
    /// browser login first when no token is cached, and checks the session
    /// with a `GET /me`.
    ///
    /// # Returns
    ///
    /// Returns a `Result` containing:
    /// - `Ok(SpotifyClient)` - An authenticated client
    /// - `Err(AuthError)` - Login, token exchange or the session check failed
    ///
    /// # Example
    ///
    /// ```
    /// let spotify = SpotifyClient::connect(&config, &log).await?;
    /// let playlists = spotify.list_playlists().await?;
    /// ```
    pub async fn connect(config: &Config, log: &SessionLog) -> Result<Self, AuthError> {
        log.info("Authenticating with Spotify...");

        let tokens = match TokenManager::load(config.spotify.clone()).await {
            Ok(tokens) => tokens,
            Err(_) => {
                log.info("No cached Spotify token, starting browser login");
                let token = auth::auth(config, log).await?;
                TokenManager::new(token, config.spotify.clone())
            }
        };

        let client = Self::new(config.spotify.api_url.clone(), tokens);
        let user = client.current_user().await.map_err(AuthError::Api)?;
        log.success(format!(
            "Successfully authenticated with Spotify as {}",
            user.display_name.unwrap_or(user.id)
        ));
        Ok(client)
    }

    async fn token(&self) -> Result<String, ApiError> {
        self.tokens.lock().await.get_valid_token().await
    }

    /// Profile of the logged-in user.
    pub async fn current_user(&self) -> Result<crate::types::CurrentUser, ApiError> {
        let token = self.token().await?;
        playlists::get_json(&self.http, &format!("{}/me", self.api_url), &token).await
    }
}

#[async_trait]
impl SourceService for SpotifyClient {
    async fn list_playlists(&self) -> Result<Vec<Playlist>, ApiError> {
        let mut all = Vec::new();
        let mut offset = 0;

        loop {
            let token = self.token().await?;
            let page = playlists::get_playlists_page(
                &self.http,
                &self.api_url,
                &token,
                PLAYLISTS_PAGE_SIZE,
                offset,
            )
            .await?;

            all.extend(page.items.into_iter().flatten());
            if page.next.is_none() {
                break;
            }
            offset += PLAYLISTS_PAGE_SIZE;
        }

        Ok(all)
    }

    async fn list_tracks(&self, playlist_id: &str) -> Result<Vec<Track>, ApiError> {
        let mut tracks = Vec::new();
        let mut next = Some(playlists::tracks_url(
            &self.api_url,
            playlist_id,
            TRACKS_PAGE_SIZE,
        ));

        while let Some(url) = next {
            let token = self.token().await?;
            let page = playlists::get_tracks_page(&self.http, &url, &token).await?;
            tracks.extend(playlists::tracks_from_page(page.items));
            next = page.next;
        }

        Ok(tracks)
    }
}
