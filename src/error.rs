use thiserror::Error;

use crate::console::Operation;

/// Failures talking to the order service. Not-found, validation and server
/// errors all land in `Status`; the console makes no distinction between them.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Transport(String),
    #[error("Unexpected status {status} from {url}")]
    Status { status: u16, url: String },
    #[error("Undecodable response: {0}")]
    Decode(String),
    #[error("Invalid url: {0}")]
    InvalidUrl(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if let Some(status) = e.status() {
            ApiError::Status {
                status: status.as_u16(),
                url: e.url().map(|u| u.to_string()).unwrap_or_default(),
            }
        } else if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Transport(e.to_string())
        }
    }
}

/// Errors returned by [`crate::clients::ConsoleClient`] methods.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConsoleError {
    #[error("{operation} failed: {source}")]
    Api {
        operation: Operation,
        #[source]
        source: ApiError,
    },
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

/// Configuration could not be loaded.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid api url {url:?}: {reason}")]
    InvalidApiUrl { url: String, reason: String },
}
