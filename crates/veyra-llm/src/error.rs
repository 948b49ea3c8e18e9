use thiserror::Error;

/// Errors returned by the chat-completions client.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("completion API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON deserialization error for completion response: {0}")]
    Deserialize(#[source] serde_json::Error),

    /// The response had no choices, or the first choice was blank.
    #[error("completion returned no content")]
    EmptyContent,

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}
