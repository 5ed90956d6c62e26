use crate::{
    logger::SessionLog,
    management::RecordStore,
    migrate::{ExportReport, MigrateError, Pacing, PlaylistOutcome, reconcile},
    services::DestinationService,
    types::Playlist,
};

/// Reconciles the playlists one after another, in selection order.
///
/// Each playlist ends with exactly one outcome. An error escaping
/// [`reconcile`] is logged and recorded as `crashed`, and the next playlist
/// is processed.
///
/// # Arguments
///
/// * `playlists` - Playlists to migrate; their records are read from `store`
/// * `store` - Record store holding the intermediate records
/// * `destination` - Authenticated destination service
/// * `pacing` - Delays inserted after playlist creation and submission
/// * `log` - Session log
///
/// # Returns
///
/// Returns a `Result` containing:
/// - `Ok(Vec<PlaylistOutcome>)` - One outcome per playlist, in input order
/// - `Err(MigrateError::CreatePlaylist)` - The destination refused to create
///   a playlist; the run stops because no later playlist would succeed
///
/// # Example
///
/// ```
/// let outcomes =
///     migrate_playlists(&selected, &store, &ytmusic, &Pacing::default(), &log).await?;
/// summarize(&outcomes).report(&log);
/// ```
pub async fn migrate_playlists<D>(
    playlists: &[Playlist],
    store: &RecordStore,
    destination: &D,
    pacing: &Pacing,
    log: &SessionLog,
) -> Result<Vec<PlaylistOutcome>, MigrateError>
where
    D: DestinationService + ?Sized,
{
    migrate_exported(playlists, &ExportReport::default(), store, destination, pacing, log).await
}

/// Like [`migrate_playlists`], but skips playlists whose export failed in
/// this run.
///
/// A skipped playlist is recorded as `crashed` with the reason
/// `export failed`, even when a record from an earlier run is on disk, so
/// outdated contents never reach the destination.
///
/// # Example
///
/// ```
/// let report = export_playlists(&spotify, &store, &selected, &log).await;
/// let outcomes =
///     migrate_exported(&selected, &report, &store, &ytmusic, &Pacing::default(), &log)
///         .await?;
/// ```
pub async fn migrate_exported<D>(
    playlists: &[Playlist],
    exports: &ExportReport,
    store: &RecordStore,
    destination: &D,
    pacing: &Pacing,
    log: &SessionLog,
) -> Result<Vec<PlaylistOutcome>, MigrateError>
where
    D: DestinationService + ?Sized,
{
    let mut outcomes = Vec::with_capacity(playlists.len());

    for playlist in playlists {
        if exports.is_failed(playlist) {
            log.error(format!(
                "Skipping '{}': export failed, the saved playlist file may be out of date",
                playlist.name
            ));
            outcomes.push(PlaylistOutcome::crashed(
                playlist.name.clone(),
                "export failed",
            ));
            continue;
        }

        match reconcile(&playlist.name, store, destination, pacing, log).await {
            Ok(outcome) => outcomes.push(outcome),
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                log.error(format!("Unexpected error on '{}': {}", playlist.name, e));
                outcomes.push(PlaylistOutcome::crashed(
                    playlist.name.clone(),
                    e.to_string(),
                ));
            }
        }
    }

    Ok(outcomes)
}
