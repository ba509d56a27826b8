//! Error handling and custom error types
//!
//! Provides unified error handling across the crate using thiserror. The
//! variants follow the four failure categories of a tagging run: the image
//! could not be encoded, the request never completed, the vendor answered
//! with a non-success status, or the response did not match the schema.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Image encoding error: {0}")]
    Encoding(String),

    #[error("Imagga API error (status {status}): {body}")]
    Vendor { status: u16, body: String },

    #[error("Unexpected {endpoint} response: {message}")]
    Schema {
        endpoint: &'static str,
        message: String,
    },

    #[error("Environment variable error: {0}")]
    EnvVar(#[from] dotenvy::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invariant violation: {0}")]
    Invariant(String),
}

impl Error {
    pub(crate) fn schema(endpoint: &'static str, message: impl Into<String>) -> Self {
        Self::Schema {
            endpoint,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
