use std::fmt;

use serde::{Deserialize, Serialize};

/// Terminal state of one playlist's migration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaylistStatus {
    Complete,
    Partial,
    NoMatches,
    MissingJson,
    EmptyJson,
    YtmusicError,
    Crashed,
    #[serde(other)]
    Unknown,
}

impl PlaylistStatus {
    pub const ALL: [PlaylistStatus; 8] = [
        PlaylistStatus::Complete,
        PlaylistStatus::Partial,
        PlaylistStatus::NoMatches,
        PlaylistStatus::MissingJson,
        PlaylistStatus::EmptyJson,
        PlaylistStatus::YtmusicError,
        PlaylistStatus::Crashed,
        PlaylistStatus::Unknown,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PlaylistStatus::Complete => "complete",
            PlaylistStatus::Partial => "partial",
            PlaylistStatus::NoMatches => "no_matches",
            PlaylistStatus::MissingJson => "missing_json",
            PlaylistStatus::EmptyJson => "empty_json",
            PlaylistStatus::YtmusicError => "ytmusic_error",
            PlaylistStatus::Crashed => "crashed",
            PlaylistStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for PlaylistStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The recorded result for one playlist of a run.
///
/// `added_count` is only set for `complete` and `partial`. `reason` carries
/// a short explanation for a `crashed` playlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistOutcome {
    pub name: String,
    pub status: PlaylistStatus,
    #[serde(rename = "added", default, skip_serializing_if = "Option::is_none")]
    pub added_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl PlaylistOutcome {
    pub fn new(name: impl Into<String>, status: PlaylistStatus) -> Self {
        Self {
            name: name.into(),
            status,
            added_count: None,
            reason: None,
        }
    }

    pub fn with_added(name: impl Into<String>, status: PlaylistStatus, added: usize) -> Self {
        Self {
            added_count: Some(added),
            ..Self::new(name, status)
        }
    }

    pub fn crashed(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            reason: Some(reason.into()),
            ..Self::new(name, PlaylistStatus::Crashed)
        }
    }

    pub fn complete(name: impl Into<String>, added: usize) -> Self {
        Self::with_added(name, PlaylistStatus::Complete, added)
    }

    pub fn partial(name: impl Into<String>, added: usize) -> Self {
        Self::with_added(name, PlaylistStatus::Partial, added)
    }
}
