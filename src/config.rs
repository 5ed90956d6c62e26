//! Configuration management for playport.
//!
//! Configuration is read from environment variables, optionally seeded from a
//! `.env` file in the local data directory. Values are collected once into a
//! [`Config`] which is handed explicitly to every component that needs it.
//!
//! The lookup order is:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (where applicable)

use std::{env, net::SocketAddr, path::PathBuf, str::FromStr};

use thiserror::Error;

pub const DEFAULT_SPOTIFY_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_SPOTIFY_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_SPOTIFY_SCOPE: &str = "playlist-read-private playlist-read-collaborative";
pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8888";
pub const DEFAULT_PLAYLISTS_DIR: &str = "playlists";
pub const DEFAULT_LOG_FILE: &str = "logs/session.log";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting {0}; add it to {1}")]
    Missing(&'static str, String),
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
    #[error("cannot read configuration file: {0}")]
    Io(#[from] std::io::Error),
}

/// Credentials and endpoints for the Spotify Web API.
#[derive(Debug, Clone)]
pub struct SpotifyConfig {
    pub client_id: String,
    pub redirect_uri: String,
    pub scope: String,
    pub auth_url: String,
    pub token_url: String,
    pub api_url: String,
}

/// Credentials for the YouTube Music OAuth client.
#[derive(Debug, Clone)]
pub struct YtMusicConfig {
    pub client_id: String,
    pub client_secret: String,
    pub oauth_file: PathBuf,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub spotify: SpotifyConfig,
    pub ytmusic: YtMusicConfig,
    pub server_addr: SocketAddr,
    pub playlists_dir: PathBuf,
    pub log_file: PathBuf,
}

impl Config {
    /// Loads the `.env` file from the local data directory (if present) and
    /// builds the configuration from the environment.
    ///
    /// The `.env` file lives in:
    /// - Linux: `~/.local/share/playport/.env`
    /// - macOS: `~/Library/Application Support/playport/.env`
    /// - Windows: `%LOCALAPPDATA%/playport/.env`
    pub async fn load() -> Result<Self, ConfigError> {
        let path = env_path();
        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        // a missing .env is fine, the environment alone may be enough
        if path.is_file() {
            dotenv::from_path(&path).map_err(|e| ConfigError::Invalid {
                key: ".env",
                reason: e.to_string(),
            })?;
        }

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &'static str| {
            get(key).ok_or_else(|| ConfigError::Missing(key, env_path().display().to_string()))
        };

        let spotify = SpotifyConfig {
            client_id: require("SPOTIFY_API_AUTH_CLIENT_ID")?,
            redirect_uri: require("SPOTIFY_API_REDIRECT_URI")?,
            scope: get("SPOTIFY_API_AUTH_SCOPE").unwrap_or_else(|| DEFAULT_SPOTIFY_SCOPE.into()),
            auth_url: get("SPOTIFY_API_AUTH_URL").unwrap_or_else(|| DEFAULT_SPOTIFY_AUTH_URL.into()),
            token_url: get("SPOTIFY_API_TOKEN_URL")
                .unwrap_or_else(|| DEFAULT_SPOTIFY_TOKEN_URL.into()),
            api_url: get("SPOTIFY_API_URL")
                .unwrap_or_else(|| DEFAULT_SPOTIFY_API_URL.into())
                .trim_end_matches('/')
                .to_string(),
        };

        let ytmusic = YtMusicConfig {
            client_id: require("YTMUSIC_CLIENT_ID")?,
            client_secret: require("YTMUSIC_CLIENT_SECRET")?,
            oauth_file: get("YTMUSIC_OAUTH_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| data_dir().join("oauth.json")),
        };

        let raw_addr = get("SERVER_ADDRESS").unwrap_or_else(|| DEFAULT_SERVER_ADDRESS.into());
        let server_addr = SocketAddr::from_str(&raw_addr).map_err(|e| ConfigError::Invalid {
            key: "SERVER_ADDRESS",
            reason: e.to_string(),
        })?;

        Ok(Self {
            spotify,
            ytmusic,
            server_addr,
            playlists_dir: get("PLAYLISTS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_PLAYLISTS_DIR)),
            log_file: get("LOG_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE)),
        })
    }
}

/// Application directory inside the platform's local data directory.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("playport");
    path
}

fn env_path() -> PathBuf {
    data_dir().join(".env")
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const REQUIRED: [(&str, &str); 4] = [
        ("SPOTIFY_API_AUTH_CLIENT_ID", "spotify-id"),
        ("SPOTIFY_API_REDIRECT_URI", "http://127.0.0.1:8888/callback"),
        ("YTMUSIC_CLIENT_ID", "yt-id"),
        ("YTMUSIC_CLIENT_SECRET", "yt-secret"),
    ];

    #[test]
    fn defaults_fill_optional_settings() {
        let config = Config::from_lookup(lookup(&REQUIRED)).unwrap();

        assert_eq!(config.spotify.api_url, DEFAULT_SPOTIFY_API_URL);
        assert_eq!(config.spotify.scope, DEFAULT_SPOTIFY_SCOPE);
        assert_eq!(config.server_addr.port(), 8888);
        assert_eq!(config.playlists_dir, PathBuf::from("playlists"));
        assert_eq!(config.log_file, PathBuf::from("logs/session.log"));
        assert!(config.ytmusic.oauth_file.ends_with("playport/oauth.json"));
    }

    #[test]
    fn missing_required_setting_is_reported_by_name() {
        let err = Config::from_lookup(lookup(&REQUIRED[1..])).unwrap_err();
        match err {
            ConfigError::Missing(key, _) => assert_eq!(key, "SPOTIFY_API_AUTH_CLIENT_ID"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn blank_values_count_as_missing() {
        let mut pairs = REQUIRED.to_vec();
        pairs[3] = ("YTMUSIC_CLIENT_SECRET", "   ");
        let err = Config::from_lookup(lookup(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("YTMUSIC_CLIENT_SECRET", _)));
    }

    #[test]
    fn malformed_server_address_is_invalid() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("SERVER_ADDRESS", "localhost"));
        let err = Config::from_lookup(lookup(&pairs)).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                key: "SERVER_ADDRESS",
                ..
            }
        ));
    }

    #[test]
    fn api_url_loses_trailing_slash() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("SPOTIFY_API_URL", "http://localhost:9000/v1/"));
        let config = Config::from_lookup(lookup(&pairs)).unwrap();
        assert_eq!(config.spotify.api_url, "http://localhost:9000/v1");
    }
}
