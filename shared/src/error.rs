use std::str::Utf8Error;
use thiserror::Error;

/// Every fault a handler can run into before it shapes a response.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Missing query parameters")]
    MissingQueryParameters,

    #[error("missing query parameter '{0}'")]
    MissingParameter(&'static str),

    #[error("invalid query parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("failed to decode key: {0}")]
    Decode(#[from] Utf8Error),

    #[error("{0}")]
    Storage(String),

    #[error(transparent)]
    Image(#[from] image::ImageError),
}
