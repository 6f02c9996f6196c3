use std::net::SocketAddr;

use axum::{Extension, Router, routing::get};

use crate::{Res, api, spotify::SpotifyAuth, warning};

pub fn router(auth: SpotifyAuth) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/login", get(api::login))
        .route("/callback", get(api::callback))
        .layer(Extension(auth))
}

/// Binds the callback listener and serves it in the background for the rest of the process.
pub async fn start_api_server(auth: SpotifyAuth) -> Res<SocketAddr> {
    let addr = auth.settings().server_addr;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let local_addr = listener.local_addr()?;

    let app = router(auth);
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            warning!("Callback server stopped: {}", e);
        }
    });

    Ok(local_addr)
}
