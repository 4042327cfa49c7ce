use thiserror::Error;

/// Errors from [`crate::service::MapService`] requests.
///
/// Every variant is a transient failure surfaced to the user; none is
/// retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The endpoint URL could not be assembled.
    #[error("invalid endpoint {url:?}: {message}")]
    InvalidEndpoint { url: String, message: String },
    /// The transport gave up waiting for the server.
    #[error("request to {url} timed out")]
    Timeout { url: String },
    /// Connecting, sending or receiving failed.
    #[error("network error contacting {url}: {message}")]
    Network { url: String, message: String },
    /// The server answered with a non-success status.
    #[error("request to {url} failed with status {status}: {message}")]
    Http {
        url: String,
        status: u16,
        message: String,
    },
    /// The response body did not match the expected schema.
    #[error("failed to decode response from {url}: {message}")]
    Decode { url: String, message: String },
}

impl FetchError {
    /// HTTP status for [`FetchError::Http`], `None` otherwise.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
