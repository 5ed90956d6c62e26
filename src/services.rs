//! Service seams between the migration pipeline and the streaming platforms.
//!
//! The pipeline only depends on these traits; [`crate::spotify::SpotifyClient`]
//! and [`crate::ytmusic::YtMusicClient`] are the production implementations.

use async_trait::async_trait;
use thiserror::Error;

use crate::types::{Playlist, Track};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{service} responded with {status}: {body}")]
    Status {
        service: &'static str,
        status: u16,
        body: String,
    },
    #[error("rate limited for {0} seconds")]
    RateLimited(u64),
    #[error("unexpected response: {0}")]
    Unexpected(String),
    #[error("authentication failed: {0}")]
    Auth(String),
}

/// Looks up a single track on the destination catalog.
#[async_trait]
pub trait TrackSearch: Send + Sync {
    /// Returns the identifier of the best match, or `None` when the catalog
    /// has nothing for this title and artist.
    async fn search_track(&self, title: &str, artist: &str) -> Result<Option<String>, ApiError>;
}

/// The service playlists are migrated from.
#[async_trait]
pub trait SourceService: Send + Sync {
    async fn list_playlists(&self) -> Result<Vec<Playlist>, ApiError>;

    async fn list_tracks(&self, playlist_id: &str) -> Result<Vec<Track>, ApiError>;
}

/// The service playlists are migrated to.
#[async_trait]
pub trait DestinationService: TrackSearch {
    async fn create_playlist(&self, name: &str, description: &str) -> Result<String, ApiError>;

    /// Adds every id in one batch. Duplicates are allowed.
    async fn add_tracks(&self, playlist_id: &str, track_ids: &[String]) -> Result<(), ApiError>;

    async fn playlist_track_ids(&self, playlist_id: &str) -> Result<Vec<String>, ApiError>;
}
