use tabled::Table;

use crate::{error, info, scraper::ScraperClient, types::EpisodeTableRow};

use super::load_scraper_settings;

pub async fn episodes(run_now: bool) {
    let mut settings = load_scraper_settings();
    settings.run_now |= run_now;

    let episodes = match ScraperClient::new(settings).list_unique_episodes().await {
        Ok(episodes) => episodes,
        Err(e) => error!("Failed to fetch episodes: {}", e),
    };

    if episodes.is_empty() {
        info!("No episodes found.");
        return;
    }

    let rows: Vec<EpisodeTableRow> = episodes
        .into_iter()
        .map(|e| EpisodeTableRow {
            title: e.title,
            link: e.link,
        })
        .collect();
    let count = rows.len();

    println!("{}", Table::new(rows));
    info!("{} unique episodes", count);
}
