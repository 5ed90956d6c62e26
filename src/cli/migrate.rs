use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    Res,
    cli::select::choose_playlists,
    config::Config,
    logger::SessionLog,
    management::RecordStore,
    migrate::{Pacing, export_playlists, migrate_exported, summarize},
    services::SourceService,
    spotify::SpotifyClient,
    ytmusic::YtMusicClient,
};

/// Runs a full migration: export the chosen Spotify playlists to local
/// records, recreate them on YouTube Music and print the summary.
pub async fn migrate(config: &Config, log: &SessionLog) -> Res<()> {
    let store = RecordStore::new(&config.playlists_dir);
    store.ensure_dir().await?;

    let spotify = SpotifyClient::connect(config, log).await?;

    let pb = spinner("Fetching Spotify playlists...");
    let playlists = spotify.list_playlists().await;
    pb.finish_and_clear();
    let playlists = playlists?;

    if playlists.is_empty() {
        return Err("No playlists found on Spotify".into());
    }
    log.info(format!("Found {} playlists on Spotify", playlists.len()));

    let selected = choose_playlists(&playlists, &store)?;

    let pb = spinner(&format!("Exporting {} playlists...", selected.len()));
    let exports = export_playlists(&spotify, &store, &selected, log).await;
    pb.finish_and_clear();
    log.info(format!(
        "Exported {} of {} playlists to {}",
        exports.exported.len(),
        selected.len(),
        store.dir().display()
    ));

    let ytmusic = YtMusicClient::connect(&config.ytmusic, log).await?;

    let outcomes = migrate_exported(
        &selected,
        &exports,
        &store,
        &ytmusic,
        &Pacing::default(),
        log,
    )
    .await?;

    summarize(&outcomes).report(log);
    Ok(())
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb
}
