use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    /// The endpoint answered with a non-success status.
    #[error("remote error ({status}): {}", .message.as_deref().unwrap_or("no details"))]
    Remote { status: u16, message: Option<String> },

    /// The endpoint answered with success but without a reply text.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("sending request: {0}")]
    Network(#[from] reqwest::Error),

    #[error("building request: {0}")]
    Request(String),
}
