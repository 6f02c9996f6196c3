use crate::{Res, errors::ensure_success, types::UserProfile};

use super::SpotifyClient;

impl SpotifyClient {
    pub async fn current_user(&self) -> Res<UserProfile> {
        let token = self.access_token().await?;

        let response = self
            .http
            .get(self.endpoint("/me"))
            .bearer_auth(&token)
            .send()
            .await?;
        let response = ensure_success(response, "current user").await?;

        Ok(response.json::<UserProfile>().await?)
    }
}
