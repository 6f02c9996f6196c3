use std::collections::HashSet;

use rand::{Rng, distr::Alphanumeric};

use crate::types::Episode;

const STATE_LENGTH: usize = 32;

/// Random anti-forgery value for one authorization round trip.
pub fn generate_state() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(STATE_LENGTH)
        .map(char::from)
        .collect()
}

/// Compares two strings without short-circuiting on the first differing byte.
pub fn constant_time_eq(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Keeps the first episode for every link, in original order.
pub fn dedupe_episodes(mut episodes: Vec<Episode>) -> Vec<Episode> {
    let mut seen_links = HashSet::new();
    episodes.retain(|episode| seen_links.insert(episode.link.clone()));
    episodes
}

/// `song` alone, or `song artist:<artist>` when an artist is known.
pub fn build_search_query(song: &str, artist: Option<&str>) -> String {
    match artist.map(str::trim).filter(|a| !a.is_empty()) {
        Some(artist) => format!("{} artist:{}", song, artist),
        None => song.to_string(),
    }
}

/// Last path segment of a Spotify track URL, ignoring any query string.
///
/// An empty final segment, as in `.../track/`, yields `None`.
pub fn track_id_from_url(url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    path.rsplit('/')
        .next()
        .filter(|id| !id.is_empty() && !id.contains(':'))
        .map(str::to_string)
}

pub fn track_uri(track_id: &str) -> String {
    format!("spotify:track:{}", track_id)
}
