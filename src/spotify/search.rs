use crate::{
    Res,
    errors::ensure_success,
    types::{SearchResponse, SpotifyTrack},
    utils,
};

use super::SpotifyClient;

impl SpotifyClient {
    /// Searches tracks by song title, narrowed by artist when one is given.
    ///
    /// Results keep Spotify's relevance order; callers treat the first one
    /// as the best match.
    pub async fn search_track(&self, song: &str, artist: Option<&str>) -> Res<Vec<SpotifyTrack>> {
        let token = self.access_token().await?;
        let query = utils::build_search_query(song, artist);

        let response = self
            .http
            .get(self.endpoint("/search"))
            .bearer_auth(&token)
            .query(&[("q", query.as_str()), ("type", "track")])
            .send()
            .await?;
        let response = ensure_success(response, "spotify search").await?;

        let res = response.json::<SearchResponse>().await?;
        Ok(res.tracks.items.into_iter().map(SpotifyTrack::from).collect())
    }
}
