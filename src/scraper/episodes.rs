use crate::{Res, types::Episode, utils};

use super::ScraperClient;

impl ScraperClient {
    /// Raw episode listing, duplicates included.
    pub async fn list_episodes(&self) -> Res<Vec<Episode>> {
        self.fetch(&self.settings.episodes_url, &[], "episode list")
            .await
    }

    /// Episode listing with one entry per link, in first-seen order.
    pub async fn list_unique_episodes(&self) -> Res<Vec<Episode>> {
        Ok(utils::dedupe_episodes(self.list_episodes().await?))
    }
}
