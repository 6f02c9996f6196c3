use axum::{
    Extension,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};

use crate::spotify::SpotifyAuth;

pub async fn login(Extension(auth): Extension<SpotifyAuth>) -> Response {
    match auth.login_url().await {
        Ok(url) => Redirect::temporary(&url).into_response(),
        Err(e) => (StatusCode::CONFLICT, Html(format!("<h4>{}</h4>", e))).into_response(),
    }
}
