use dialoguer::{MultiSelect, theme::ColorfulTheme};

use crate::{Res, management::RecordStore, types::Playlist};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionEntry<'a> {
    pub playlist: &'a Playlist,
    /// A record for this playlist already exists on disk.
    pub saved: bool,
}

impl SelectionEntry<'_> {
    /// Menu label: `* ` marks a saved playlist, two spaces keep unsaved names
    /// in the same column.
    pub fn label(&self) -> String {
        let marker = if self.saved { "*" } else { " " };
        format!("{} {}", marker, self.playlist.name)
    }
}

/// Orders playlists for the selection menu: not yet exported first, then the
/// ones with a saved record. Source order is kept within each group.
pub fn selection_entries<'a>(
    playlists: &'a [Playlist],
    store: &RecordStore,
) -> Vec<SelectionEntry<'a>> {
    let (saved, unsaved): (Vec<_>, Vec<_>) = playlists
        .iter()
        .map(|playlist| SelectionEntry {
            playlist,
            saved: store.exists(&playlist.name),
        })
        .partition(|entry| entry.saved);

    unsaved.into_iter().chain(saved).collect()
}

/// Shows the multi-select menu and returns the chosen playlists in menu
/// order. Choosing nothing is an error.
pub fn choose_playlists(playlists: &[Playlist], store: &RecordStore) -> Res<Vec<Playlist>> {
    let entries = selection_entries(playlists, store);
    let labels: Vec<String> = entries.iter().map(SelectionEntry::label).collect();

    let chosen = MultiSelect::with_theme(&ColorfulTheme::default())
        .with_prompt("Select playlists to migrate (space to toggle, enter to confirm; * = already saved)")
        .items(&labels)
        .interact()?;

    if chosen.is_empty() {
        return Err("No playlists selected".into());
    }

    Ok(chosen
        .into_iter()
        .map(|i| entries[i].playlist.clone())
        .collect())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::types::PlaylistRecord;

    fn playlist(id: &str, name: &str) -> Playlist {
        Playlist {
            id: id.into(),
            name: name.into(),
        }
    }

    #[tokio::test]
    async fn saved_playlists_are_listed_last_and_marked() {
        let dir = TempDir::new().unwrap();
        let store = RecordStore::new(dir.path());
        store
            .persist("Road Trip", &PlaylistRecord::new(Vec::new()))
            .await
            .unwrap();

        let playlists = vec![
            playlist("1", "Road Trip"),
            playlist("2", "Focus"),
            playlist("3", "Gym"),
        ];
        let entries = selection_entries(&playlists, &store);
        let labels: Vec<String> = entries.iter().map(SelectionEntry::label).collect();

        assert_eq!(labels, vec!["  Focus", "  Gym", "* Road Trip"]);
        assert!(entries[2].saved);
        assert_eq!(entries[2].playlist.id, "1");
    }

    #[test]
    fn nothing_saved_keeps_source_order() {
        let dir = TempDir::new().unwrap();
        let store = RecordStore::new(dir.path());
        let playlists = vec![playlist("1", "B"), playlist("2", "A")];

        let entries = selection_entries(&playlists, &store);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].playlist.name, "B");
        assert_eq!(entries[0].label(), "  B");
        assert!(entries.iter().all(|e| !e.saved));
    }
}
