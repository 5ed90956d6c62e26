//! # API Module
//!
//! HTTP endpoints served by the local callback server during the Spotify
//! login:
//!
//! - [`callback`] - receives the authorization code and exchanges it, together
//!   with the PKCE verifier, for an access token
//! - [`health`] - reports version and login progress
//!
//! ```rust,ignore
//! use axum::{Router, routing::get};
//! use playport::api::{callback, health};
//!
//! let app = Router::new()
//!     .route("/callback", get(callback))
//!     .route("/health", get(health));
//! ```

mod callback;
mod health;

pub use callback::CallbackState;
pub use callback::callback;
pub use health::health;
