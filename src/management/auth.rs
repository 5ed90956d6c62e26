use std::path::PathBuf;

use chrono::Utc;

use crate::{
    config::{self, SpotifyConfig},
    management::StoreError,
    services::ApiError,
    spotify,
    types::Token,
};

pub struct TokenManager {
    token: Token,
    spotify: SpotifyConfig,
}

impl TokenManager {
    pub fn new(token: Token, spotify: SpotifyConfig) -> Self {
        TokenManager { token, spotify }
    }

    pub async fn load(spotify: SpotifyConfig) -> Result<Self, StoreError> {
        let content = async_fs::read_to_string(Self::token_path()).await?;
        let token: Token = serde_json::from_str(&content)?;
        Ok(Self { token, spotify })
    }

    pub async fn persist(&self) -> Result<(), StoreError> {
        let path = Self::token_path();
        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(&self.token)?;
        async_fs::write(path, json).await?;
        Ok(())
    }

    /// Returns an access token, refreshing it first when it is about to expire.
    pub async fn get_valid_token(&mut self) -> Result<String, ApiError> {
        if self.is_expired() {
            let mut new_token =
                spotify::auth::refresh_token(&self.spotify, &self.token.refresh_token).await?;
            // Spotify may omit the refresh token when it does not rotate it
            if new_token.refresh_token.is_empty() {
                new_token.refresh_token = self.token.refresh_token.clone();
            }
            self.token = new_token;
            let _ = self.persist().await;
        }

        Ok(self.token.access_token.clone())
    }

    fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp() as u64;
        now >= (self.token.obtained_at + self.token.expires_in).saturating_sub(240)
    }

    fn token_path() -> PathBuf {
        config::data_dir().join("cache/token.json")
    }
}
