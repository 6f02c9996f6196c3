//! Episode and track-mention sources backed by the scraping provider.
//!
//! Both endpoints take the API key, a `run_now` flag forcing a fresh crawl
//! and a fixed page size, and answer `{ "data": [...] }`. Only the first
//! page is read; anything beyond [`PAGE_LIMIT`] items is not visible.

mod episodes;
mod tracks;

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::{Res, config::ScraperSettings, errors::ensure_success, types::ScrapeResponse};

pub const PAGE_LIMIT: &str = "1000";

#[derive(Clone)]
pub struct ScraperClient {
    http: Client,
    settings: ScraperSettings,
}

impl ScraperClient {
    pub fn new(settings: ScraperSettings) -> Self {
        ScraperClient {
            http: Client::new(),
            settings,
        }
    }

    pub fn settings(&self) -> &ScraperSettings {
        &self.settings
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        url: &str,
        extra: &[(&str, &str)],
        context: &str,
    ) -> Res<Vec<T>> {
        let run_now = if self.settings.run_now { "true" } else { "false" };
        let mut params = vec![
            ("apikey", self.settings.api_key.as_str()),
            ("run_now", run_now),
            ("limit", PAGE_LIMIT),
        ];
        params.extend_from_slice(extra);

        let pb = spinner(&format!("Fetching {}...", context));
        let response = self.http.get(url).query(&params).send().await;
        pb.finish_and_clear();

        let response = ensure_success(response?, context).await?;
        let res = response.json::<ScrapeResponse<T>>().await?;
        Ok(res.data)
    }
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}
