use std::{collections::HashMap, fmt};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// One podcast episode as listed by the scraping provider. `link` is unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    #[serde(rename = "episode")]
    pub title: String,
    #[serde(rename = "episode_link")]
    pub link: String,
}

/// A song the scraping provider found in an episode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackMention {
    #[serde(default)]
    pub artist: Option<String>,
    pub song: String,
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default, rename = "timestampString")]
    pub timestamp_string: String,
    #[serde(default, rename = "uid")]
    pub source_id: String,
    #[serde(default, rename = "url")]
    pub source_url: String,
}

impl TrackMention {
    /// The artist, if the provider supplied a non-blank one.
    pub fn artist(&self) -> Option<&str> {
        self.artist.as_deref().map(str::trim).filter(|a| !a.is_empty())
    }
}

/// Envelope every scraping provider endpoint answers with.
#[derive(Debug, Clone, Deserialize)]
pub struct ScrapeResponse<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

/// A search hit, flattened from the Spotify track object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpotifyTrack {
    pub name: String,
    pub artists: Vec<String>,
    pub album_name: String,
    pub external_urls: HashMap<String, String>,
}

impl SpotifyTrack {
    /// Track id taken from the last path segment of `external_urls["spotify"]`.
    pub fn track_id(&self) -> Option<String> {
        self.external_urls
            .get("spotify")
            .and_then(|url| crate::utils::track_id_from_url(url))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    pub tracks: TrackPage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackPage {
    #[serde(default)]
    pub items: Vec<TrackObject>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackObject {
    pub name: String,
    pub artists: Vec<ArtistObject>,
    pub album: AlbumObject,
    #[serde(default)]
    pub external_urls: HashMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArtistObject {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlbumObject {
    pub name: String,
}

impl From<TrackObject> for SpotifyTrack {
    fn from(track: TrackObject) -> Self {
        SpotifyTrack {
            name: track.name,
            artists: track.artists.into_iter().map(|a| a.name).collect(),
            album_name: track.album.name,
            external_urls: track.external_urls,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistItemsResponse {
    #[serde(default)]
    pub items: Vec<PlaylistItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistItem {
    // null for removed or local tracks
    pub track: Option<PlaylistTrackRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistTrackRef {
    pub id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistRequest {
    pub uris: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: i64,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

/// Query parameters Spotify appends to the redirect URI.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// One authorization round trip. Replaced every time a new flow starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub state: String,
    pub created_at: DateTime<Utc>,
}

/// Process-wide token state. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenState {
    pub access_token: Option<String>,
    pub expires_at: DateTime<Utc>,
    pub last_verified_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthPhase {
    Idle,
    AwaitingUserLogin,
    AwaitingCallback,
    Authenticated,
    Failed,
}

impl fmt::Display for AuthPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AuthPhase::Idle => "idle",
            AuthPhase::AwaitingUserLogin => "awaiting_user_login",
            AuthPhase::AwaitingCallback => "awaiting_callback",
            AuthPhase::Authenticated => "authenticated",
            AuthPhase::Failed => "failed",
        };
        f.write_str(name)
    }
}

#[derive(Tabled)]
pub struct EpisodeTableRow {
    pub title: String,
    pub link: String,
}

#[derive(Tabled)]
pub struct MentionTableRow {
    pub time: String,
    pub artist: String,
    pub song: String,
}

#[derive(Tabled)]
pub struct SyncTableRow {
    pub episode: String,
    pub artist: String,
    pub song: String,
    pub spotify_id: String,
    pub status: String,
}
