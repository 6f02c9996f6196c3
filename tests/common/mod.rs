#![allow(dead_code)]

use std::time::Duration;

use chrono::Utc;
use podcastify::{
    config::{DEFAULT_SPOTIFY_SCOPE, ScraperSettings, SpotifySettings},
    types::TokenState,
};

pub const REDIRECT_URI: &str = "http://127.0.0.1:8000/callback";

// Port 0 so parallel tests never fight over the callback listener.
pub fn spotify_settings(base: &str) -> SpotifySettings {
    SpotifySettings {
        client_id: "test_id".to_string(),
        client_secret: "test_secret".to_string(),
        redirect_uri: REDIRECT_URI.to_string(),
        scope: DEFAULT_SPOTIFY_SCOPE.to_string(),
        auth_url: format!("{}/authorize", base),
        token_url: format!("{}/api/token", base),
        api_url: format!("{}/v1", base),
        server_addr: "127.0.0.1:0".parse().unwrap(),
        auth_timeout: Some(Duration::from_secs(2)),
        open_browser: false,
    }
}

pub fn scraper_settings(base: &str) -> ScraperSettings {
    ScraperSettings {
        api_key: "scrape-key".to_string(),
        run_now: false,
        episodes_url: format!("{}/episodes", base),
        tracks_url: format!("{}/tracks", base),
    }
}

pub fn token_state(token: &str, expires_in: i64, verified_ago: Option<i64>) -> TokenState {
    let now = Utc::now();
    TokenState {
        access_token: Some(token.to_string()),
        expires_at: now + chrono::Duration::seconds(expires_in),
        last_verified_at: verified_ago.map(|ago| now - chrono::Duration::seconds(ago)),
    }
}

/// A token that passes the gate without a probe.
pub fn verified_token(token: &str) -> TokenState {
    token_state(token, 3600, Some(0))
}
