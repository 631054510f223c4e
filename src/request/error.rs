use axum::extract::multipart::{MultipartError, MultipartRejection};
use thiserror::Error;

/// Failures while reading or decoding the request payload.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("request body is empty")]
    EmptyBody,
    #[error("could not decode request body as JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("JSON request body must be an object")]
    NotAnObject,
    #[error("request body exceeds {limit} bytes")]
    TooLarge { limit: usize },
    #[error("could not read request body: {0}")]
    Body(#[source] axum::Error),
    #[error("invalid multipart request: {0}")]
    MultipartRejected(#[from] MultipartRejection),
    #[error("invalid multipart field: {0}")]
    Multipart(#[from] MultipartError),
}
