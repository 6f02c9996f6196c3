//! Error taxonomy shared by every component.
//!
//! Nothing in the crate retries; every error travels up to the command
//! that started the work.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A scraping provider or Spotify endpoint answered with a non-success status.
    #[error("{context} failed with status {status}: {body}")]
    Provider {
        context: String,
        status: u16,
        body: String,
    },

    /// The `state` returned to the callback does not match the issued session.
    #[error("state mismatch in authorization callback")]
    StateMismatch,

    /// Code exchange failed, the login was abandoned, or the token was rejected afterwards.
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Headers were requested without a usable cached token.
    #[error("access token expired or missing")]
    TokenExpired,

    #[error("config error: {0}")]
    Config(String),

    #[error("http error: {0}")]
    Http(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("io error: {0}")]
    Io(String),
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Error::Parse(e.to_string())
        } else {
            Error::Http(e.to_string())
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Parse(e.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e.to_string())
    }
}

/// Turns a non-success response into [`Error::Provider`], keeping the body for context.
pub async fn ensure_success(
    response: reqwest::Response,
    context: &str,
) -> Result<reqwest::Response, Error> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(Error::Provider {
        context: context.to_string(),
        status: status.as_u16(),
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_names_context_and_status() {
        let err = Error::Provider {
            context: "spotify search".to_string(),
            status: 404,
            body: "not found".to_string(),
        };

        assert_eq!(
            err.to_string(),
            "spotify search failed with status 404: not found"
        );
    }

    #[test]
    fn io_errors_are_flattened() {
        let err: Error = std::io::Error::new(std::io::ErrorKind::AddrInUse, "port taken").into();
        assert_eq!(err, Error::Io("port taken".to_string()));
    }
}
