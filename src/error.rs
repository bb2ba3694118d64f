use thiserror::Error;

/// Failure of a single search request against the movie database.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("search service returned status {0}")]
    Status(u16),

    #[error("malformed search response: {0}")]
    Decode(#[from] serde_json::Error),
}
