use thiserror::Error;

/// Failures of the text-generation step. Any of these fails the order.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// HTTP transport or connection error.
    #[error("generation request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("generation request timed out")]
    Timeout,

    /// The provider answered with a non-success status.
    #[error("generation provider returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The provider envelope did not contain a leading text block.
    #[error("generation response had no text content")]
    EmptyResponse,

    /// The generated text was not a valid misspelling object.
    #[error("generated text is not a valid misspelling: {0}")]
    InvalidShape(String),
}

impl From<reqwest::Error> for GenerationError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            GenerationError::Timeout
        } else {
            GenerationError::Request(e.to_string())
        }
    }
}
