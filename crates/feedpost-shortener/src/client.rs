use std::time::Duration;

use feedpost_core::{Url, UrlShortener};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::Client;

use crate::error::ShortenerError;

/// Client for the is.gd `create.php` endpoint in `format=simple` mode, where
/// the body is the bare short URL.
pub struct IsGdShortener {
    client: Client,
    endpoint: Url,
}

impl IsGdShortener {
    /// # Errors
    ///
    /// Returns [`ShortenerError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(endpoint: Url, timeout_secs: u64, user_agent: &str) -> Result<Self, ShortenerError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client, endpoint })
    }

    fn request_url(&self, long: &Url) -> String {
        let encoded = utf8_percent_encode(long.as_str(), NON_ALPHANUMERIC);
        format!("{}?format=simple&url={encoded}", self.endpoint)
    }

    /// Shortens `long` in one attempt.
    ///
    /// # Errors
    ///
    /// - [`ShortenerError::Rejected`] on a non-2xx status.
    /// - [`ShortenerError::Http`] on network failure.
    /// - [`ShortenerError::InvalidShortUrl`] if the body is not an absolute URL.
    pub async fn shorten_url(&self, long: &Url) -> Result<Url, ShortenerError> {
        let response = self.client.get(self.request_url(long)).send().await?;
        let status = response.status();
        let body = response.text().await?;
        let body = body.trim();
        if !status.is_success() {
            return Err(ShortenerError::Rejected {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }
        let short = Url::parse(body).map_err(|source| ShortenerError::InvalidShortUrl {
            body: body.to_string(),
            source,
        })?;
        tracing::debug!(long = %long, short = %short, "link shortened");
        Ok(short)
    }
}

impl UrlShortener for IsGdShortener {
    type Error = ShortenerError;

    async fn shorten(&self, url: &Url) -> Result<Url, Self::Error> {
        self.shorten_url(url).await
    }
}
