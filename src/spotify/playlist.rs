use crate::{
    Res,
    errors::ensure_success,
    types::{AddTrackToPlaylistRequest, PlaylistItemsResponse},
    utils,
};

use super::SpotifyClient;

/// Only the first page of a playlist is inspected.
pub const PLAYLIST_PAGE_LIMIT: u32 = 100;

impl SpotifyClient {
    /// Checks the first [`PLAYLIST_PAGE_LIMIT`] items of a playlist for `track_id`.
    pub async fn is_track_in_playlist(&self, track_id: &str, playlist_id: &str) -> Res<bool> {
        let token = self.access_token().await?;
        let limit = PLAYLIST_PAGE_LIMIT.to_string();

        let response = self
            .http
            .get(self.endpoint(&format!("/playlists/{}/tracks", playlist_id)))
            .bearer_auth(&token)
            .query(&[("fields", "items(track(id))"), ("limit", limit.as_str())])
            .send()
            .await?;
        let response = ensure_success(response, "playlist lookup").await?;

        let res = response.json::<PlaylistItemsResponse>().await?;
        Ok(res
            .items
            .iter()
            .filter_map(|item| item.track.as_ref())
            .filter_map(|track| track.id.as_deref())
            .any(|id| id == track_id))
    }

    /// Appends one track. Duplicates are not prevented here; check membership first.
    pub async fn add_track_to_playlist(&self, track_id: &str, playlist_id: &str) -> Res<()> {
        let token = self.access_token().await?;
        let body = AddTrackToPlaylistRequest {
            uris: vec![utils::track_uri(track_id)],
        };

        let response = self
            .http
            .post(self.endpoint(&format!("/playlists/{}/tracks", playlist_id)))
            .bearer_auth(&token)
            .json(&body)
            .send()
            .await?;
        ensure_success(response, "playlist append").await?;
        Ok(())
    }
}
