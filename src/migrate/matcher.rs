use crate::{logger::SessionLog, services::TrackSearch, types::Track, utils};

/// Searches the destination for every track, in input order.
///
/// A search that finds nothing, or fails, drops the track and the loop moves
/// on. One log event is emitted per track. The returned ids keep the order in
/// which they were first found and contain no duplicates, since two source
/// tracks can resolve to the same destination song.
///
/// # Example
///
/// ```
/// let record = store.load("Road Trip").await?.unwrap_or_default();
/// let ids = match_tracks(&record.tracks, &ytmusic, &log).await;
/// println!("{} of {} tracks found", ids.len(), record.tracks.len());
/// ```
pub async fn match_tracks<S>(tracks: &[Track], search: &S, log: &SessionLog) -> Vec<String>
where
    S: TrackSearch + ?Sized,
{
    let mut ids = Vec::with_capacity(tracks.len());

    for track in tracks {
        log.info(format!("Searching for {} - {}", track.title, track.artist));

        let found = match search.search_track(&track.title, &track.artist).await {
            Ok(found) => found.filter(|id| !id.is_empty()),
            Err(e) => {
                log.warn(format!(
                    "Search failed for '{} - {}': {}",
                    track.title, track.artist, e
                ));
                None
            }
        };

        match found {
            Some(id) => {
                log.success(format!("{} - {}", track.title, track.artist));
                ids.push(id);
            }
            None => log.error(format!("NOT FOUND: {} - {}", track.title, track.artist)),
        }
    }

    utils::dedup_preserving_order(ids)
}
