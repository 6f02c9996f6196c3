//! # API Module
//!
//! HTTP endpoints served by the loopback listener during the Spotify
//! Authorization Code flow.
//!
//! ## Endpoints
//!
//! - [`login`] - Redirects the browser to Spotify's authorize page, carrying
//!   the `state` of the session currently in flight. Answers `409 Conflict`
//!   when no login is in progress.
//! - [`callback`] - Receives `code` and `state` from Spotify, rejects a
//!   mismatched `state` with `400 Bad Request` before any token exchange,
//!   and otherwise exchanges the code and stores the token.
//! - [`health`] - Reports the crate version and the current auth phase.
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use axum::{Extension, Router, routing::get};
//! use podcastify::api::{callback, health, login};
//!
//! let app = Router::new()
//!     .route("/login", get(login))
//!     .route("/callback", get(callback))
//!     .route("/health", get(health))
//!     .layer(Extension(auth));
//! ```

mod callback;
mod health;
mod login;

pub use callback::callback;
pub use health::health;
pub use login::login;
