use std::time::Duration;

use feedpost_core::{FeedItem, FeedSource, Url};
use reqwest::Client;

use crate::error::FeedError;
use crate::parse::parse_latest_item;

/// HTTP client for a single RSS feed URL.
pub struct RssFeedClient {
    client: Client,
    feed_url: Url,
}

impl RssFeedClient {
    /// Creates a client for `feed_url` with the given timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Http`] if the underlying `reqwest::Client` cannot be
    /// constructed.
    pub fn new(feed_url: Url, timeout_secs: u64, user_agent: &str) -> Result<Self, FeedError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client, feed_url })
    }

    #[must_use]
    pub fn feed_url(&self) -> &Url {
        &self.feed_url
    }

    /// Download the feed and return its newest item.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Http`] on network failure or a non-2xx status, and
    /// [`FeedError::Xml`] if the body is not well-formed XML.
    pub async fn latest_item(&self) -> Result<Option<FeedItem>, FeedError> {
        let response = self
            .client
            .get(self.feed_url.clone())
            .send()
            .await?
            .error_for_status()?;
        let body = response.text().await?;
        let item = parse_latest_item(&body)?;
        if item.is_none() {
            tracing::info!(feed = %self.feed_url, "feed has no entries");
        }
        Ok(item)
    }
}

impl FeedSource for RssFeedClient {
    type Error = FeedError;

    async fn fetch_latest(&self) -> Result<Option<FeedItem>, Self::Error> {
        self.latest_item().await
    }
}
