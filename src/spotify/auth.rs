use std::{sync::Arc, time::Duration};

use chrono::Utc;
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::{
    config::{Config, SpotifyConfig},
    logger::SessionLog,
    management::{StoreError, TokenManager},
    server::start_api_server,
    services::ApiError,
    types::{PkceToken, Token},
    utils,
};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("cannot start callback server: {0}")]
    Server(#[from] std::io::Error),
    #[error("authentication failed or timed out")]
    TimedOut,
    #[error("{0}")]
    Api(#[from] ApiError),
    #[error("failed to save token to cache: {0}")]
    Store(#[from] StoreError),
}

/// Runs the complete OAuth 2.0 PKCE authentication flow with Spotify.
///
/// 1. Generates a code verifier and its S256 challenge
/// 2. Starts the local callback server on `SERVER_ADDRESS`
/// 3. Opens the authorization URL in the default browser
/// 4. Waits up to 60 seconds for the callback to deliver a token
/// 5. Persists the token to the cache for later runs
///
/// If the browser cannot be opened the URL is printed so the user can open
/// it manually.
pub async fn auth(config: &Config, log: &SessionLog) -> Result<Token, AuthError> {
    let code_verifier = utils::generate_code_verifier();
    let code_challenge = utils::generate_code_challenge(&code_verifier);

    let shared_state: Arc<Mutex<Option<PkceToken>>> = Arc::new(Mutex::new(Some(PkceToken {
        code_verifier,
        token: None,
    })));

    let server = start_api_server(
        config.server_addr,
        Arc::clone(&shared_state),
        config.spotify.clone(),
    )
    .await?;

    let auth_url = authorize_url(&config.spotify, &code_challenge);

    if webbrowser::open(&auth_url).is_err() {
        log.warn(format!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        ));
    }

    let token = wait_for_token(shared_state).await;
    server.abort();

    let token = token.ok_or(AuthError::TimedOut)?;
    TokenManager::new(token.clone(), config.spotify.clone())
        .persist()
        .await?;

    log.success("Spotify authentication successful!");
    Ok(token)
}

pub fn authorize_url(spotify: &SpotifyConfig, code_challenge: &str) -> String {
    format!(
        "{spotify_auth_url}?client_id={client_id}&response_type=code&redirect_uri={redirect_uri}&code_challenge={code_challenge}&code_challenge_method=S256&scope={scope}",
        spotify_auth_url = spotify.auth_url,
        client_id = spotify.client_id,
        redirect_uri = spotify.redirect_uri,
        code_challenge = code_challenge,
        scope = spotify.scope.replace(' ', "%20")
    )
}

/// Polls the shared state once per second for up to 60 seconds.
async fn wait_for_token(shared_state: Arc<Mutex<Option<PkceToken>>>) -> Option<Token> {
    use std::time::Instant;

    let max_wait = Duration::from_secs(60);
    let start = Instant::now();

    while start.elapsed() < max_wait {
        let lock = shared_state.lock().await;
        if let Some(token) = lock.as_ref().and_then(|pkce| pkce.token.as_ref()) {
            return Some(token.clone());
        }
        drop(lock);
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    None
}

/// Exchanges a refresh token for a fresh access token.
pub async fn refresh_token(spotify: &SpotifyConfig, refresh_token: &str) -> Result<Token, ApiError> {
    let res = Client::new()
        .post(&spotify.token_url)
        .form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", spotify.client_id.as_str()),
        ])
        .send()
        .await?;

    token_from_response(res).await
}

/// Exchanges the authorization code from the callback for a token.
///
/// The verifier must be the one whose challenge was sent with the
/// authorization request.
pub async fn exchange_code_pkce(
    spotify: &SpotifyConfig,
    code: &str,
    verifier: &str,
) -> Result<Token, ApiError> {
    let res = Client::new()
        .post(&spotify.token_url)
        .form(&[
            ("grant_type", "authorization_code"),
            ("client_id", spotify.client_id.as_str()),
            ("code", code),
            ("code_verifier", verifier),
            ("redirect_uri", spotify.redirect_uri.as_str()),
        ])
        .send()
        .await?;

    token_from_response(res).await
}

async fn token_from_response(res: reqwest::Response) -> Result<Token, ApiError> {
    let status = res.status();
    let json: Value = res.json().await?;

    if !status.is_success() {
        return Err(ApiError::Auth(format!(
            "token endpoint responded with {}: {}",
            status,
            json["error_description"]
                .as_str()
                .or(json["error"].as_str())
                .unwrap_or("unknown error")
        )));
    }

    token_from_json(&json)
}

pub fn token_from_json(json: &Value) -> Result<Token, ApiError> {
    let access_token = json["access_token"]
        .as_str()
        .ok_or_else(|| ApiError::Auth("token response without access_token".into()))?;

    Ok(Token {
        access_token: access_token.to_string(),
        refresh_token: json["refresh_token"]
            .as_str()
            .unwrap_or_default()
            .to_string(),
        scope: json["scope"].as_str().unwrap_or_default().to_string(),
        expires_in: json["expires_in"].as_u64().unwrap_or(3600),
        obtained_at: Utc::now().timestamp() as u64,
    })
}
