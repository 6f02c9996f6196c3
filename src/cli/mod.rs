//! # CLI Module
//!
//! User-facing commands. Each one builds its clients from [`Settings`]
//! (or just the scraper part of it when Spotify is not involved),
//! delegates to the library, and turns any error into a fatal `error!` line.
//!
//! ## Commands
//!
//! - [`auth`] - Runs the Spotify login flow and prints the authenticated user
//! - [`episodes`] - Lists the deduplicated episodes from the scraping provider
//! - [`tracks`] - Lists the music played in one episode
//! - [`sync`] - Adds every matched track to the target playlist
//!
//! ## Usage Patterns
//!
//! ```bash
//! podcastify auth                         # Check Spotify credentials
//! podcastify episodes --run-now           # Force a fresh crawl first
//! podcastify tracks https://pod.example/ep/12
//! podcastify sync --dry-run               # Search and check, never append
//! ```

mod auth;
mod episodes;
mod sync;
mod tracks;

pub use auth::auth;
pub use episodes::episodes;
pub use sync::sync;
pub use tracks::tracks;

use crate::{
    config::{ScraperSettings, Settings},
    error,
};

pub(crate) fn load_settings() -> Settings {
    match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => error!("Cannot load configuration. Err: {}", e),
    }
}

/// Scraper configuration only, for commands that never reach Spotify.
pub(crate) fn load_scraper_settings() -> ScraperSettings {
    match ScraperSettings::from_env() {
        Ok(settings) => settings,
        Err(e) => error!("Cannot load configuration. Err: {}", e),
    }
}
