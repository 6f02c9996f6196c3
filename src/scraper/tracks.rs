use crate::{Res, types::TrackMention};

use super::ScraperClient;

impl ScraperClient {
    /// Songs the provider found in the episode at `episode_link`.
    pub async fn find_music_played(&self, episode_link: &str) -> Res<Vec<TrackMention>> {
        self.fetch(
            &self.settings.tracks_url,
            &[("source_url", episode_link)],
            "music played",
        )
        .await
    }
}
