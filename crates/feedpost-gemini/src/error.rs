use thiserror::Error;

/// Errors returned by the Gemini API client.
#[derive(Debug, Error)]
pub enum GeminiError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-2xx status and an error envelope.
    #[error("Gemini API error {status}: {message}")]
    Api { status: u16, message: String },

    /// The prompt was blocked before any candidate was produced.
    #[error("prompt blocked: {0}")]
    Blocked(String),

    /// The response held no candidate text.
    #[error("response contained no text")]
    EmptyResponse,

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}
