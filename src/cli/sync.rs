use tabled::Table;

use crate::{
    error, info,
    management::{PlaylistSync, TrackOutcome},
    scraper::ScraperClient,
    spotify::{SpotifyAuth, SpotifyClient},
    success,
};

use super::load_settings;

pub async fn sync(run_now: bool, dry_run: bool, no_browser: bool, playlist: Option<String>) {
    let mut settings = load_settings();
    settings.scraper.run_now |= run_now;
    settings.spotify.open_browser = !no_browser;
    if playlist.is_some() {
        settings.playlist_id = playlist;
    }

    let playlist_id = match settings.playlist_id() {
        Ok(id) => id.to_string(),
        Err(e) => error!("{}", e),
    };

    let scraper = ScraperClient::new(settings.scraper);
    let spotify = SpotifyClient::new(SpotifyAuth::new(settings.spotify));
    let report = match PlaylistSync::new(scraper, spotify, playlist_id)
        .dry_run(dry_run)
        .run()
        .await
    {
        Ok(report) => report,
        Err(e) => error!("Sync aborted: {}", e),
    };

    if report.mentions() == 0 {
        info!("No music mentions found.");
        return;
    }

    println!("{}", Table::new(report.rows()));

    let present = report.count(|o| matches!(o, TrackOutcome::AlreadyPresent(_)));
    let missing = report.count(|o| matches!(o, TrackOutcome::NotFound));
    if dry_run {
        let pending = report.count(|o| matches!(o, TrackOutcome::WouldAdd(_)));
        info!(
            "Dry run: {} would be added, {} already present, {} not found",
            pending, present, missing
        );
    } else {
        success!(
            "{} added, {} already present, {} not found",
            report.added(),
            present,
            missing
        );
    }
}
