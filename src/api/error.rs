use thiserror::Error;

/// Errors that can occur while talking to the PokeAPI.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The configured base URL cannot carry path segments
    #[error("Invalid API base URL '{url}'")]
    InvalidBaseUrl { url: String },

    /// Transport-level failure (DNS, connect, timeout)
    #[error("Request to '{url}' failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Upstream answered with a non-2xx status
    #[error("'{url}' returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// Response body did not match the expected shape
    #[error("Failed to decode response from '{url}': {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The operation's cancel token fired before it finished
    #[error("Request cancelled")]
    Cancelled,
}

impl ApiError {
    /// True for a 404, i.e. the requested Pokémon does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Status { status: 404, .. })
    }
}
