//! # Spotify Integration Module
//!
//! Client for the handful of Spotify Web API endpoints the sync needs, plus
//! the Authorization Code flow that gates every one of them.
//!
//! ## Architecture
//!
//! ```text
//! PlaylistSync
//!      ↓
//! SpotifyClient ── search / playlist / user
//!      ↓  ensure_access_token() before every call
//! SpotifyAuth ── TokenCache + loopback listener
//!      ↓
//! Spotify Web API / Accounts service
//! ```
//!
//! ## API Coverage
//!
//! - `GET /search?type=track` - Track search, provider relevance order
//! - `GET /playlists/{id}/tracks` - First page (100 items) of a playlist
//! - `POST /playlists/{id}/tracks` - Append one track URI
//! - `GET /me` - Current user; also the live validity probe
//! - `POST /api/token` - Authorization code exchange
//!
//! ## Error Handling
//!
//! Every call makes a single attempt. A non-success status becomes
//! [`crate::Error::Provider`]; nothing is retried.

pub mod auth;
mod playlist;
mod search;
mod user;

use reqwest::Client;

pub use auth::{PendingLogin, SpotifyAuth};
pub use playlist::PLAYLIST_PAGE_LIMIT;

use crate::Res;

#[derive(Clone)]
pub struct SpotifyClient {
    http: Client,
    auth: SpotifyAuth,
}

impl SpotifyClient {
    pub fn new(auth: SpotifyAuth) -> Self {
        SpotifyClient {
            http: Client::new(),
            auth,
        }
    }

    pub fn auth(&self) -> &SpotifyAuth {
        &self.auth
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}{}",
            self.auth.settings().api_url.trim_end_matches('/'),
            path
        )
    }

    /// Runs the token gate and returns the bearer token for the next request.
    async fn access_token(&self) -> Res<String> {
        self.auth.ensure_access_token().await?;
        self.auth.bearer().await
    }
}
