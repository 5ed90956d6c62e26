use std::path::PathBuf;

use chrono::Utc;
use reqwest::Client;
use serde_json::Value;

use crate::{config::YtMusicConfig, management::StoreError, services::ApiError, types::YtOAuthToken};

pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Holds the YouTube Music OAuth token and keeps it fresh.
///
/// The token lives in the `oauth.json` file produced by Google's device-code
/// flow; refreshed tokens are written back to the same file.
pub struct YtTokenManager {
    token: YtOAuthToken,
    path: PathBuf,
    client_id: String,
    client_secret: String,
}

impl YtTokenManager {
    pub fn new(token: YtOAuthToken, config: &YtMusicConfig) -> Self {
        Self {
            token,
            path: config.oauth_file.clone(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
        }
    }

    pub async fn load(config: &YtMusicConfig) -> Result<Self, StoreError> {
        let content = async_fs::read_to_string(&config.oauth_file).await?;
        let token: YtOAuthToken = serde_json::from_str(&content)?;
        Ok(Self::new(token, config))
    }

    pub async fn persist(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(&self.token)?;
        async_fs::write(&self.path, json).await?;
        Ok(())
    }

    pub async fn get_valid_token(&mut self) -> Result<String, ApiError> {
        if self.is_expired() {
            self.token = self.refresh_token().await?;
            let _ = self.persist().await;
        }
        Ok(self.token.access_token.clone())
    }

    pub fn token_type(&self) -> &str {
        &self.token.token_type
    }

    fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp() as u64;
        now + 60 >= self.token.expires_at
    }

    async fn refresh_token(&self) -> Result<YtOAuthToken, ApiError> {
        let res = Client::new()
            .post(GOOGLE_TOKEN_URL)
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", self.token.refresh_token.as_str()),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
            ])
            .send()
            .await?;

        let status = res.status();
        let json: Value = res.json().await?;
        if !status.is_success() {
            return Err(ApiError::Auth(format!(
                "token refresh rejected ({}): {}",
                status,
                json["error_description"]
                    .as_str()
                    .or(json["error"].as_str())
                    .unwrap_or("unknown error")
            )));
        }

        let access_token = json["access_token"]
            .as_str()
            .ok_or_else(|| ApiError::Auth("token refresh returned no access_token".into()))?
            .to_string();
        let expires_in = json["expires_in"].as_u64().unwrap_or(3600);

        Ok(YtOAuthToken {
            access_token,
            refresh_token: self.token.refresh_token.clone(),
            expires_at: Utc::now().timestamp() as u64 + expires_in,
            expires_in,
            token_type: json["token_type"]
                .as_str()
                .unwrap_or(&self.token.token_type)
                .to_string(),
            scope: json["scope"]
                .as_str()
                .unwrap_or(&self.token.scope)
                .to_string(),
        })
    }
}
