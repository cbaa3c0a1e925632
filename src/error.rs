//! Shared wire-level error type.

use thiserror::Error;

/// Failure talking to the remote API.
///
/// Every HTTP surface in the crate reports through this: a non-success
/// status, a transport failure, or a body that does not decode into the
/// expected shape. Nothing is retried.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// The server answered with a non-success status.
    #[error("server responded with status {0}")]
    Status(u16),
    /// The request never completed.
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
    /// The response body was not the expected JSON shape.
    #[error("unexpected response body: {0}")]
    Body(#[source] reqwest::Error),
}
