//! Boundaries between the publishing pipeline and the services it drives.
//!
//! Each adapter crate implements one of these traits; the pipeline only ever
//! sees the trait, so tests swap in in-memory fakes.

use std::future::Future;

use url::Url;

use crate::items::FeedItem;
use crate::posts::{AssembledPost, PublishReceipt, PublishedPostView};

/// Source of the newest news item.
pub trait FeedSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Returns the newest item, or `None` when the feed has no usable entry.
    fn fetch_latest(&self) -> impl Future<Output = Result<Option<FeedItem>, Self::Error>> + Send;
}

/// Generative text backend that writes captions.
pub trait CaptionGenerator {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Returns free text for `prompt`. No length or content guarantee.
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String, Self::Error>> + Send;
}

/// Read and write access to the account's post history.
pub trait SocialPlatform {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Returns the most recent post authored by `handle`, if any.
    fn latest_post(
        &self,
        handle: &str,
    ) -> impl Future<Output = Result<Option<PublishedPostView>, Self::Error>> + Send;

    /// Publishes `post`. This is the only irreversible side effect of a run.
    fn publish(
        &self,
        post: &AssembledPost,
    ) -> impl Future<Output = Result<PublishReceipt, Self::Error>> + Send;
}

/// Turns a long link into a short one.
pub trait UrlShortener {
    type Error: std::error::Error + Send + Sync + 'static;

    fn shorten(&self, url: &Url) -> impl Future<Output = Result<Url, Self::Error>> + Send;
}
