//! Configuration management for the podcast playlist sync.
//!
//! This module handles loading and accessing configuration values from
//! environment variables and `.env` files. Values are resolved in order:
//! 1. Environment variables (highest priority)
//! 2. `.env` in the current working directory
//! 3. `.env` in the local data directory
//! 4. Application defaults (where applicable)
//!
//! Missing or malformed values are reported as [`Error::Config`].

use std::{env, net::SocketAddr, path::PathBuf, str::FromStr, time::Duration};

use crate::{Res, errors::Error};

pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8000";
pub const DEFAULT_SPOTIFY_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_SPOTIFY_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_SPOTIFY_SCOPE: &str =
    "user-read-private playlist-modify-private playlist-modify-public";

/// Loads environment variables from `.env` files.
///
/// The working directory `.env` is read first, then
/// `<data_local_dir>/podcastify/.env`. Variables already set in the process
/// environment are never overwritten, and a missing file is not an error.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/podcastify/.env`
/// - macOS: `~/Library/Application Support/podcastify/.env`
/// - Windows: `%LOCALAPPDATA%/podcastify/.env`
///
/// # Errors
///
/// Fails if the data directory cannot be created or an existing `.env`
/// cannot be parsed.
pub async fn load_env() -> Res<()> {
    allow_missing(dotenv::dotenv().map(|_| ()), ".env")?;

    let path = env_file_path();
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }

    if async_fs::metadata(&path).await.is_ok() {
        allow_missing(dotenv::from_path(&path), &path.display().to_string())?;
    }
    Ok(())
}

/// A missing file is fine; anything else about it is reported.
fn allow_missing(result: dotenv::Result<()>, name: &str) -> Res<()> {
    match result {
        Err(e) if !e.not_found() => Err(Error::Config(format!("cannot read {}: {}", name, e))),
        _ => Ok(()),
    }
}

fn env_file_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("podcastify/.env");
    path
}

/// Settings for the scraping provider endpoints.
#[derive(Debug, Clone)]
pub struct ScraperSettings {
    pub api_key: String,
    pub run_now: bool,
    pub episodes_url: String,
    pub tracks_url: String,
}

/// Settings for the Spotify Web API and the authorization flow.
#[derive(Debug, Clone)]
pub struct SpotifySettings {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub scope: String,
    pub auth_url: String,
    pub token_url: String,
    pub api_url: String,
    pub server_addr: SocketAddr,
    /// `None` waits for the login callback indefinitely.
    pub auth_timeout: Option<Duration>,
    pub open_browser: bool,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub scraper: ScraperSettings,
    pub spotify: SpotifySettings,
    pub playlist_id: Option<String>,
}

impl Settings {
    pub fn from_env() -> Res<Self> {
        Ok(Self {
            scraper: ScraperSettings::from_env()?,
            spotify: SpotifySettings::from_env()?,
            playlist_id: optional("SPOTIFY_PLAYLIST_ID"),
        })
    }

    /// Returns the target playlist, which only the sync command requires.
    pub fn playlist_id(&self) -> Res<&str> {
        self.playlist_id
            .as_deref()
            .ok_or_else(|| Error::Config("SPOTIFY_PLAYLIST_ID must be set".to_string()))
    }
}

impl ScraperSettings {
    pub fn from_env() -> Res<Self> {
        let run_now = match optional("SIMPLE_SCRAPER_RUN_NOW") {
            Some(raw) => parse_flag(&raw).ok_or_else(|| {
                Error::Config(format!("SIMPLE_SCRAPER_RUN_NOW is not a boolean: {}", raw))
            })?,
            None => false,
        };

        Ok(Self {
            api_key: required("SIMPLE_SCRAPER_API_KEY")?,
            run_now,
            episodes_url: required("SIMPLE_SCRAPER_LIST_EPISODES_BASE_URL")?,
            tracks_url: required("SIMPLE_SCRAPER_FIND_MUSIC_PLAYED_BASE_URL")?,
        })
    }
}

impl SpotifySettings {
    pub fn from_env() -> Res<Self> {
        let address = optional("SERVER_ADDRESS").unwrap_or_else(|| DEFAULT_SERVER_ADDRESS.into());
        let server_addr = SocketAddr::from_str(&address)
            .map_err(|e| Error::Config(format!("invalid SERVER_ADDRESS {}: {}", address, e)))?;

        let auth_timeout = match optional("SPOTIFY_AUTH_TIMEOUT_SECS") {
            Some(raw) => Some(Duration::from_secs(raw.parse().map_err(|_| {
                Error::Config(format!("SPOTIFY_AUTH_TIMEOUT_SECS is not a number: {}", raw))
            })?)),
            None => None,
        };

        Ok(Self {
            client_id: required("SPOTIFY_APP_CLIENT_ID")?,
            client_secret: required("SPOTIFY_APP_CLIENT_SECRET")?,
            redirect_uri: optional("SPOTIFY_API_REDIRECT_URI")
                .unwrap_or_else(|| default_redirect_uri(&server_addr)),
            scope: optional("SPOTIFY_API_AUTH_SCOPE").unwrap_or_else(|| DEFAULT_SPOTIFY_SCOPE.into()),
            auth_url: optional("SPOTIFY_API_AUTH_URL")
                .unwrap_or_else(|| DEFAULT_SPOTIFY_AUTH_URL.into()),
            token_url: optional("SPOTIFY_API_TOKEN_URL")
                .unwrap_or_else(|| DEFAULT_SPOTIFY_TOKEN_URL.into()),
            api_url: optional("SPOTIFY_API_URL").unwrap_or_else(|| DEFAULT_SPOTIFY_API_URL.into()),
            server_addr,
            auth_timeout,
            open_browser: true,
        })
    }
}

pub fn default_redirect_uri(addr: &SocketAddr) -> String {
    format!("http://{}/callback", addr)
}

/// Parses the boolean spellings accepted for flag variables.
pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

fn required(key: &str) -> Res<String> {
    optional(key).ok_or_else(|| Error::Config(format!("{} must be set", key)))
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
