use std::{collections::HashMap, time::Duration};

use thiserror::Error;
use tokio::time::sleep;

use crate::{
    logger::SessionLog,
    management::{RecordStore, StoreError},
    migrate::{PlaylistOutcome, PlaylistStatus, match_tracks},
    services::{ApiError, DestinationService},
    ytmusic::DEFAULT_DESCRIPTION,
};

#[derive(Debug, Error)]
pub enum MigrateError {
    /// Destination auth or quota problems; no later playlist would succeed.
    #[error("failed to create playlist '{name}': {source}")]
    CreatePlaylist { name: String, source: ApiError },
    #[error("{0}")]
    Store(#[from] StoreError),
}

impl MigrateError {
    /// Whether the whole run has to stop instead of moving to the next
    /// playlist.
    pub fn is_fatal(&self) -> bool {
        matches!(self, MigrateError::CreatePlaylist { .. })
    }
}

/// Pauses that give the eventually consistent destination time to settle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    /// Wait between creating a playlist and the first track search.
    pub after_create: Duration,
    /// Wait between the batch add and reading the playlist back.
    pub after_submit: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            after_create: Duration::from_millis(1500),
            after_submit: Duration::from_millis(1000),
        }
    }
}

impl Pacing {
    /// No waiting at all. Meant for test doubles that are consistent
    /// immediately.
    ///
    /// # Example
    ///
    /// ```
    /// let outcome = reconcile("Focus", &store, &fake, &Pacing::none(), &log).await?;
    /// ```
    pub fn none() -> Self {
        Self {
            after_create: Duration::ZERO,
            after_submit: Duration::ZERO,
        }
    }
}

/// How the destination playlist compares to what was submitted.
///
/// Only `Exact` counts as complete. The other kinds are kept apart so the
/// log says what went wrong, but they all end up as `partial`: a playlist
/// holding more than was submitted is not distinguished from one holding
/// less.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    Exact,
    /// Some submitted ids are absent.
    Missing(usize),
    /// Every submitted id is present, plus extra ones.
    Surplus(usize),
    /// Both absent and unexpected ids.
    Divergent,
}

/// Compares submitted and actual ids as multisets.
///
/// Order is ignored and duplicates count. Two copies of a submitted id must
/// appear twice on the destination.
///
/// # Arguments
///
/// * `submitted` - Ids sent in the batch add
/// * `actual` - Ids read back from the destination playlist
///
/// # Returns
///
/// - `Exact` - Same ids with the same multiplicities
/// - `Missing(n)` - `actual` is a strict sub-multiset, `n` ids short
/// - `Surplus(n)` - `actual` is a strict super-multiset, `n` ids extra
/// - `Divergent` - Neither contains the other
///
/// # Example
///
/// ```
/// let ids = |v: &[&str]| v.iter().map(|s| s.to_string()).collect::<Vec<_>>();
/// assert_eq!(verify(&ids(&["a", "a"]), &ids(&["a"])), Verification::Missing(1));
/// ```
pub fn verify(submitted: &[String], actual: &[String]) -> Verification {
    let expected = counts(submitted);
    let found = counts(actual);

    if expected == found {
        return Verification::Exact;
    }

    if covers(&expected, &found) {
        Verification::Missing(submitted.len() - actual.len())
    } else if covers(&found, &expected) {
        Verification::Surplus(actual.len() - submitted.len())
    } else {
        Verification::Divergent
    }
}

/// Whether multiset `a` contains every element of `b` at least as often.
fn covers(a: &HashMap<&str, usize>, b: &HashMap<&str, usize>) -> bool {
    b.iter()
        .all(|(id, n)| a.get(*id).copied().unwrap_or(0) >= *n)
}

fn counts(ids: &[String]) -> HashMap<&str, usize> {
    let mut map = HashMap::new();
    for id in ids {
        *map.entry(id.as_str()).or_insert(0) += 1;
    }
    map
}

/// Migrates one playlist from its intermediate record to the destination.
///
/// 1. Load the record: absent → `missing_json`, empty → `empty_json`
/// 2. Create the destination playlist; failure is fatal for the whole run
/// 3. Match every track: nothing found → `no_matches`
/// 4. Submit all matched ids in one batch: failure → `ytmusic_error`, no retry
/// 5. Re-fetch the playlist and compare: exact → `complete`, else `partial`
///
/// Errors that are not turned into an outcome here are returned for the
/// caller to record as `crashed`.
///
/// # Arguments
///
/// * `name` - Source playlist name; the record and the new playlist use it
/// * `store` - Record store to load the intermediate record from
/// * `destination` - Authenticated destination service
/// * `pacing` - Waits after creation and after submission
/// * `log` - Session log
///
/// # Returns
///
/// Returns a `Result` containing:
/// - `Ok(PlaylistOutcome)` - The playlist's final status
/// - `Err(MigrateError::CreatePlaylist)` - Fatal, the run must stop
/// - `Err(MigrateError::Store)` - The record exists but cannot be read
///
/// # Example
///
/// ```
/// let outcome = reconcile("Road Trip", &store, &ytmusic, &Pacing::default(), &log).await?;
/// println!("{}: {}", outcome.name, outcome.status);
/// ```
pub async fn reconcile<D>(
    name: &str,
    store: &RecordStore,
    destination: &D,
    pacing: &Pacing,
    log: &SessionLog,
) -> Result<PlaylistOutcome, MigrateError>
where
    D: DestinationService + ?Sized,
{
    let Some(record) = store.load(name).await? else {
        log.error(format!("Missing JSON file for playlist: {}", name));
        return Ok(PlaylistOutcome::new(name, PlaylistStatus::MissingJson));
    };

    log.info(format!("Processing playlist: {}", name));

    if record.is_empty() {
        log.warn(format!("Playlist file for '{}' contains no tracks", name));
        return Ok(PlaylistOutcome::new(name, PlaylistStatus::EmptyJson));
    }

    log.info(format!("Creating playlist: '{}'", name));
    let playlist_id = destination
        .create_playlist(name, DEFAULT_DESCRIPTION)
        .await
        .map_err(|source| MigrateError::CreatePlaylist {
            name: name.to_string(),
            source,
        })?;
    sleep(pacing.after_create).await;

    let matched = match_tracks(&record.tracks, destination, log).await;
    if matched.is_empty() {
        log.warn(format!("No songs matched for playlist '{}'", name));
        return Ok(PlaylistOutcome::new(name, PlaylistStatus::NoMatches));
    }

    log.info(format!("Adding {} songs to playlist...", matched.len()));
    if let Err(e) = destination.add_tracks(&playlist_id, &matched).await {
        log.error(format!(
            "Failed to upload '{}' to YouTube Music: {}",
            name, e
        ));
        return Ok(PlaylistOutcome::new(name, PlaylistStatus::YtmusicError));
    }
    sleep(pacing.after_submit).await;

    let actual = match destination.playlist_track_ids(&playlist_id).await {
        Ok(ids) => ids,
        Err(e) => {
            log.error(format!("Failed to fetch playlist '{}': {}", playlist_id, e));
            Vec::new()
        }
    };

    match verify(&matched, &actual) {
        Verification::Exact => {
            log.success(format!(
                "Added {} songs to playlist '{}'",
                matched.len(),
                name
            ));
            Ok(PlaylistOutcome::complete(name, matched.len()))
        }
        mismatch => {
            let detail = match mismatch {
                Verification::Missing(n) => format!("{} songs missing", n),
                Verification::Surplus(n) => format!("{} unexpected extra songs", n),
                _ => "contents differ from the submitted songs".to_string(),
            };
            log.warn(format!(
                "Partial success for '{}': {} of {} songs present, {}",
                name,
                actual.len(),
                matched.len(),
                detail
            ));
            Ok(PlaylistOutcome::partial(name, actual.len()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn same_ids_in_any_order_are_exact() {
        assert_eq!(
            verify(&ids(&["a", "b", "c"]), &ids(&["c", "a", "b"])),
            Verification::Exact
        );
    }

    #[test]
    fn fewer_ids_are_missing() {
        assert_eq!(
            verify(&ids(&["a", "b", "c"]), &ids(&["a"])),
            Verification::Missing(2)
        );
        assert_eq!(verify(&ids(&["a"]), &[]), Verification::Missing(1));
    }

    #[test]
    fn extra_ids_are_surplus() {
        assert_eq!(
            verify(&ids(&["a", "b"]), &ids(&["a", "b", "b"])),
            Verification::Surplus(1)
        );
    }

    #[test]
    fn different_ids_diverge() {
        assert_eq!(
            verify(&ids(&["a", "b"]), &ids(&["a", "z"])),
            Verification::Divergent
        );
    }

    #[test]
    fn only_create_failures_are_fatal() {
        let fatal = MigrateError::CreatePlaylist {
            name: "Mix".into(),
            source: ApiError::Auth("expired".into()),
        };
        let local = MigrateError::Store(StoreError::Io(std::io::Error::other("disk")));

        assert!(fatal.is_fatal());
        assert!(!local.is_fatal());
    }
}
