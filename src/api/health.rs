use axum::{Extension, response::Json};
use serde_json::{Value, json};

use crate::api::CallbackState;

/// Reports the server version and whether the Spotify login has produced a
/// token yet.
pub async fn health(Extension(state): Extension<CallbackState>) -> Json<Value> {
    let login = match state.pkce.lock().await.as_ref() {
        Some(pkce) if pkce.token.is_some() => "complete",
        Some(_) => "pending",
        None => "idle",
    };

    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "login": login
    }))
}
