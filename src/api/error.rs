use thiserror::Error;

/// Errors returned by the ChillRate API client
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure: DNS, refused connection, timeout
    #[error("Network error: {0}")]
    Network(String),

    /// The server answered with a payload carrying an `error` field
    #[error("{0}")]
    Rejected(String),

    /// Non-success status without a business error in the body
    #[error("API error (status {status}): {message}")]
    ApiResponseError { status: u16, message: String },

    /// The body was not the JSON shape we expected
    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl ApiError {
    /// Whether the failure happened before any response was received
    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::Network(_))
    }
}
