//! # Migration Module
//!
//! The track-matching and playlist-reconciliation pipeline.
//!
//! ```text
//! Exporter (export)           source playlists -> playlists/<name>.json
//!          ↓
//! Matcher (matcher)           tracks -> deduplicated destination ids
//!          ↓
//! Reconciler (reconcile)      create -> add -> verify -> PlaylistOutcome
//!          ↓
//! Summary (summary)           outcomes -> counts + detail lines
//! ```
//!
//! Playlists are processed strictly one after another and no search runs
//! concurrently with another one; the destination API is rate and timing
//! sensitive. Everything here works against the traits in
//! [`crate::services`].

mod export;
mod matcher;
mod outcome;
mod reconcile;
mod run;
mod summary;

pub use export::ExportError;
pub use export::ExportReport;
pub use export::export_playlist;
pub use export::export_playlists;
pub use matcher::match_tracks;
pub use outcome::PlaylistOutcome;
pub use outcome::PlaylistStatus;
pub use reconcile::MigrateError;
pub use reconcile::Pacing;
pub use reconcile::Verification;
pub use reconcile::reconcile;
pub use reconcile::verify;
pub use run::migrate_exported;
pub use run::migrate_playlists;
pub use summary::Summary;
pub use summary::SummaryLine;
pub use summary::summarize;
