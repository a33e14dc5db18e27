use thiserror::Error;

/// Errors returned by the Bluesky XRPC client.
#[derive(Debug, Error)]
pub enum BlueskyError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    ///
    /// `error` is the XRPC error name (`AuthenticationRequired`,
    /// `RateLimitExceeded`, ...) when the body carried one.
    #[error("XRPC {method} failed with {status}: {}", .error.as_deref().unwrap_or("unknown"))]
    Xrpc {
        method: &'static str,
        status: u16,
        error: Option<String>,
        message: Option<String>,
    },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}
