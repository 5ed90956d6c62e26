use std::{net::SocketAddr, sync::Arc};

use axum::{Extension, Router, routing::get};
use tokio::{sync::Mutex, task::JoinHandle};

use crate::{
    api::{self, CallbackState},
    config::SpotifyConfig,
    types::PkceToken,
    warning,
};

/// Binds the OAuth callback server and serves it in a background task.
///
/// Binding happens before this returns so an occupied port is reported to
/// the caller instead of being lost inside the task.
pub async fn start_api_server(
    addr: SocketAddr,
    state: Arc<Mutex<Option<PkceToken>>>,
    spotify: SpotifyConfig,
) -> std::io::Result<JoinHandle<()>> {
    let app = router(CallbackState {
        pkce: state,
        spotify,
    });

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    Ok(tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            warning!("Callback server stopped: {}", e);
        }
    }))
}

pub fn router(state: CallbackState) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/callback", get(api::callback))
        .layer(Extension(state))
}
