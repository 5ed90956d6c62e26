//! # CLI Module
//!
//! User-facing commands. Each command takes the loaded [`crate::config::Config`]
//! and the run's [`crate::logger::SessionLog`], and returns an error only for
//! fatal setup problems; per-playlist failures are reported in the summary.
//!
//! - [`auth`] - runs the Spotify PKCE login and caches the token
//! - [`migrate`] - export, select, import and summary in one run

mod auth;
mod migrate;
mod select;

pub use auth::auth;
pub use migrate::migrate;
pub use select::SelectionEntry;
pub use select::choose_playlists;
pub use select::selection_entries;
