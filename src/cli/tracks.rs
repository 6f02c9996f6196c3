use tabled::Table;

use crate::{error, info, scraper::ScraperClient, types::MentionTableRow};

use super::load_scraper_settings;

pub async fn tracks(link: String, run_now: bool) {
    let mut settings = load_scraper_settings();
    settings.run_now |= run_now;

    let mentions = match ScraperClient::new(settings).find_music_played(&link).await {
        Ok(mentions) => mentions,
        Err(e) => error!("Failed to fetch music played in {}: {}", link, e),
    };

    if mentions.is_empty() {
        info!("No music found for {}", link);
        return;
    }

    let rows: Vec<MentionTableRow> = mentions
        .iter()
        .map(|m| MentionTableRow {
            time: m.timestamp_string.clone(),
            artist: m.artist().unwrap_or("-").to_string(),
            song: m.song.clone(),
        })
        .collect();

    println!("{}", Table::new(rows));
}
