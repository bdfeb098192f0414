use thiserror::Error;

/// Errors returned by completion models.
#[derive(Debug, Error)]
pub enum ReviewError {
    /// Network, TLS, timeout, or body decoding failure from the HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The completion API answered with a non-success status.
    #[error("completion API returned {status}: {body}")]
    Api { status: u16, body: String },

    /// The response carried no choice or an empty message.
    #[error("completion API returned no content")]
    EmptyCompletion,

    /// No API key was configured for the completion API.
    #[error("AI review is not configured: OPENAI_API_KEY is not set")]
    NotConfigured,

    #[error("invalid completion API base URL '{0}'")]
    InvalidBaseUrl(String),
}
