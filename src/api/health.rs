use axum::{Extension, response::Json};
use serde_json::{Value, json};

use crate::spotify::SpotifyAuth;

pub async fn health(Extension(auth): Extension<SpotifyAuth>) -> Json<Value> {
    let phase = auth.phase().await;
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "auth": phase,
    }))
}
