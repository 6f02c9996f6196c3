use axum::{Extension, extract::Query, http::StatusCode, response::Html};

use crate::{errors::Error, spotify::SpotifyAuth, types::CallbackParams, warning};

pub async fn callback(
    Query(params): Query<CallbackParams>,
    Extension(auth): Extension<SpotifyAuth>,
) -> (StatusCode, Html<String>) {
    match auth.complete_login(&params).await {
        Ok(()) => (
            StatusCode::OK,
            Html(
                "<h2>Authentication successful.</h2><p>Close this window and return to the terminal.</p>"
                    .to_string(),
            ),
        ),
        Err(Error::StateMismatch) => {
            warning!("Rejected authorization callback with a mismatched state");
            (
                StatusCode::BAD_REQUEST,
                Html("<h4>State mismatch.</h4>".to_string()),
            )
        }
        Err(e) => {
            warning!("Login failed: {}", e);
            (
                StatusCode::UNAUTHORIZED,
                Html(format!("<h4>Login failed.</h4><p>{}</p>", e)),
            )
        }
    }
}
