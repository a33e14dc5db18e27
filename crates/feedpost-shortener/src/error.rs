use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShortenerError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// is.gd answers refusals (banned domain, rate limit) with a non-2xx
    /// status and a plain-text reason.
    #[error("shortener refused with {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("shortener returned an invalid URL {body:?}: {source}")]
    InvalidShortUrl {
        body: String,
        #[source]
        source: url::ParseError,
    },
}
