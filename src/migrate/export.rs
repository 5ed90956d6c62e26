use std::path::PathBuf;

use thiserror::Error;

use crate::{
    logger::SessionLog,
    management::{RecordStore, StoreError},
    services::{ApiError, SourceService},
    types::{Playlist, PlaylistRecord},
};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("cannot fetch tracks of '{name}': {source}")]
    Fetch { name: String, source: ApiError },
    #[error("cannot save playlist '{name}': {source}")]
    Save { name: String, source: StoreError },
}

/// Result of exporting a selection of playlists.
///
/// Every selected playlist ends up in exactly one of the two lists, in
/// selection order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportReport {
    /// Playlists whose record was written in this run.
    pub exported: Vec<Playlist>,
    /// Playlists whose export failed. A record on disk for one of these is
    /// left over from an earlier run and must not be imported.
    pub failed: Vec<Playlist>,
}

impl ExportReport {
    pub fn is_failed(&self, playlist: &Playlist) -> bool {
        self.failed.contains(playlist)
    }
}

/// Fetches all tracks of a source playlist and writes its intermediate record.
///
/// An earlier export of the same playlist is overwritten. The record file
/// name is derived from the playlist name through
/// [`crate::utils::sanitize_filename`].
///
/// # Arguments
///
/// * `source` - Authenticated source service
/// * `store` - Record store the file is written to
/// * `playlist` - The playlist to export
/// * `log` - Session log for progress messages
///
/// # Returns
///
/// Returns a `Result` containing:
/// - `Ok(PathBuf)` - Path of the written record
/// - `Err(ExportError::Fetch)` - The track listing failed
/// - `Err(ExportError::Save)` - The record could not be written
///
/// # Example
///
/// ```
/// let path = export_playlist(&spotify, &store, &playlist, &log).await?;
/// println!("saved to {}", path.display());
/// ```
pub async fn export_playlist<S>(
    source: &S,
    store: &RecordStore,
    playlist: &Playlist,
    log: &SessionLog,
) -> Result<PathBuf, ExportError>
where
    S: SourceService + ?Sized,
{
    let tracks = source
        .list_tracks(&playlist.id)
        .await
        .map_err(|source| ExportError::Fetch {
            name: playlist.name.clone(),
            source,
        })?;

    let path = store
        .persist(&playlist.name, &PlaylistRecord::new(tracks))
        .await
        .map_err(|source| ExportError::Save {
            name: playlist.name.clone(),
            source,
        })?;

    log.success(format!("Saved playlist to: {}", path.display()));
    Ok(path)
}

/// Exports every selected playlist in turn.
///
/// A failed export is logged and does not stop the remaining exports. The
/// failure is kept in the returned [`ExportReport`] so the importer can skip
/// the playlist instead of migrating an outdated record.
///
/// # Arguments
///
/// * `source` - Authenticated source service
/// * `store` - Record store the files are written to
/// * `playlists` - The selected playlists, in selection order
/// * `log` - Session log for progress and error messages
///
/// # Returns
///
/// An [`ExportReport`] splitting the selection into exported and failed
/// playlists.
///
/// # Example
///
/// ```
/// let report = export_playlists(&spotify, &store, &selected, &log).await;
/// if !report.failed.is_empty() {
///     println!("{} playlists could not be exported", report.failed.len());
/// }
/// ```
pub async fn export_playlists<S>(
    source: &S,
    store: &RecordStore,
    playlists: &[Playlist],
    log: &SessionLog,
) -> ExportReport
where
    S: SourceService + ?Sized,
{
    let mut report = ExportReport::default();

    for playlist in playlists {
        match export_playlist(source, store, playlist, log).await {
            Ok(_) => report.exported.push(playlist.clone()),
            Err(e) => {
                log.error(e.to_string());
                report.failed.push(playlist.clone());
            }
        }
    }

    report
}
