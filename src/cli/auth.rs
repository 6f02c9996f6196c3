use crate::{
    error,
    spotify::{SpotifyAuth, SpotifyClient},
    success,
};

use super::load_settings;

pub async fn auth(no_browser: bool) {
    let mut settings = load_settings().spotify;
    settings.open_browser = !no_browser;

    let client = SpotifyClient::new(SpotifyAuth::new(settings));
    match client.current_user().await {
        Ok(user) => success!(
            "Authenticated as {}",
            user.display_name.unwrap_or(user.id)
        ),
        Err(e) => error!("Authentication failed: {}", e),
    }
}
