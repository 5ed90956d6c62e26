use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use thiserror::Error;

use crate::{types::PlaylistRecord, utils};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Serde(#[from] serde_json::Error),
    #[error("invalid playlist record {}: {source}", path.display())]
    InvalidRecord {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Directory of intermediate playlist records, one JSON file per playlist.
///
/// Files are named after the sanitised playlist name, so the exporter and the
/// importer agree on the location without sharing any other state.
#[derive(Debug, Clone)]
pub struct RecordStore {
    dir: PathBuf,
}

impl RecordStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub async fn ensure_dir(&self) -> Result<(), StoreError> {
        async_fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    pub fn path_for(&self, playlist_name: &str) -> PathBuf {
        self.dir
            .join(format!("{}.json", utils::sanitize_filename(playlist_name)))
    }

    /// Whether a record was already exported for this playlist name.
    pub fn exists(&self, playlist_name: &str) -> bool {
        self.path_for(playlist_name).is_file()
    }

    /// Loads the record for a playlist. `Ok(None)` means no file exists.
    pub async fn load(&self, playlist_name: &str) -> Result<Option<PlaylistRecord>, StoreError> {
        let path = self.path_for(playlist_name);
        let content = match async_fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::Io(e)),
        };

        let record = serde_json::from_str::<PlaylistRecord>(&content)
            .map_err(|source| StoreError::InvalidRecord { path, source })?;
        Ok(Some(record))
    }

    /// Writes the record, replacing any previous export of the same playlist.
    pub async fn persist(
        &self,
        playlist_name: &str,
        record: &PlaylistRecord,
    ) -> Result<PathBuf, StoreError> {
        self.ensure_dir().await?;

        let path = self.path_for(playlist_name);
        let json = serde_json::to_string_pretty(record)?;
        async_fs::write(&path, json).await?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Track;

    #[tokio::test]
    async fn persisted_record_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("playlists"));
        let record = PlaylistRecord::new(vec![
            Track::new("Song A", "Artist A", "Album A"),
            Track::new("Song B", "Artist B", "Album B"),
        ]);

        let path = store.persist("Road/Trip: 2024", &record).await.unwrap();

        assert_eq!(path, dir.path().join("playlists/Road_Trip_ 2024.json"));
        assert!(store.exists("Road/Trip: 2024"));
        assert_eq!(store.load("Road/Trip: 2024").await.unwrap(), Some(record));
    }

    #[tokio::test]
    async fn record_is_written_as_indented_array() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::new(dir.path());
        let record = PlaylistRecord::new(vec![Track::new("Song", "Artist", "Album")]);

        let path = store.persist("Mix", &record).await.unwrap();
        let content = std::fs::read_to_string(path).unwrap();

        assert!(content.starts_with("[\n"));
        assert!(content.contains("  {\n    \"title\": \"Song\""));
    }

    #[tokio::test]
    async fn missing_record_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::new(dir.path());

        assert!(!store.exists("Nonexistent Playlist"));
        assert_eq!(store.load("Nonexistent Playlist").await.unwrap(), None);
    }

    #[tokio::test]
    async fn wrong_shape_is_a_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::new(dir.path());
        std::fs::write(store.path_for("Broken"), r#"[{"name": "no title here"}]"#).unwrap();

        let err = store.load("Broken").await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidRecord { .. }));
    }

    #[tokio::test]
    async fn album_is_optional_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::new(dir.path());
        std::fs::write(store.path_for("Old"), r#"[{"title": "T", "artist": "A"}]"#).unwrap();

        let record = store.load("Old").await.unwrap().unwrap();
        assert_eq!(record.tracks, vec![Track::new("T", "A", "")]);
    }
}
