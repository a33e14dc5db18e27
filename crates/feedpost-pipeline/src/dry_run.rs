//! Platform wrapper that reads for real but never writes.

use chrono::Utc;
use feedpost_core::{AssembledPost, PublishReceipt, PublishedPostView, SocialPlatform};

/// Delegates reads to the wrapped platform and logs posts instead of
/// publishing them.
#[derive(Debug, Clone)]
pub struct DryRunPlatform<P> {
    inner: P,
}

impl<P> DryRunPlatform<P> {
    #[must_use]
    pub fn new(inner: P) -> Self {
        Self { inner }
    }
}

impl<P> SocialPlatform for DryRunPlatform<P>
where
    P: SocialPlatform + Sync,
{
    type Error = P::Error;

    async fn latest_post(&self, handle: &str) -> Result<Option<PublishedPostView>, Self::Error> {
        self.inner.latest_post(handle).await
    }

    async fn publish(&self, post: &AssembledPost) -> Result<PublishReceipt, Self::Error> {
        tracing::info!(
            text = %post.text,
            chars = post.char_len(),
            embed = ?post.embed.as_ref().map(|e| e.uri.as_str()),
            "dry-run: would publish post"
        );
        Ok(PublishReceipt {
            uri: "dry-run".to_string(),
            cid: String::new(),
            created_at: Utc::now(),
        })
    }
}
