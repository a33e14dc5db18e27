//! Author feed read-back used for duplicate detection.

use feedpost_core::{PublishedPostView, Url};

use crate::client::BlueskyClient;
use crate::error::BlueskyError;
use crate::retry::{retry_with_backoff, RetryClass};
use crate::types::{AuthorFeedResponse, PostView};

const GET_AUTHOR_FEED: &str = "app.bsky.feed.getAuthorFeed";

/// Reposts carry a `reason` and are skipped, so fetch a few entries to find
/// the newest post the account wrote itself.
const AUTHOR_FEED_PAGE: &str = "10";

impl BlueskyClient {
    /// Returns the newest top-level post written by `actor`.
    ///
    /// Replies are filtered server-side; reposts and pins are skipped here.
    ///
    /// # Errors
    ///
    /// - [`BlueskyError::Xrpc`] if login or the feed call is rejected.
    /// - [`BlueskyError::Http`] on network failure.
    /// - [`BlueskyError::Deserialize`] if the response shape is unexpected.
    pub async fn latest_own_post(
        &self,
        actor: &str,
    ) -> Result<Option<PublishedPostView>, BlueskyError> {
        let session = self.session().await?;
        let url = self.endpoint(GET_AUTHOR_FEED);
        let response: AuthorFeedResponse =
            retry_with_backoff(RetryClass::Read, self.max_retries, self.backoff_base_ms, || {
                self.send_json(
                    GET_AUTHOR_FEED,
                    self.client
                        .get(&url)
                        .bearer_auth(&session.access_jwt)
                        .query(&[
                            ("actor", actor),
                            ("limit", AUTHOR_FEED_PAGE),
                            ("filter", "posts_no_replies"),
                        ]),
                )
            })
            .await?;

        let latest = response
            .feed
            .into_iter()
            .find(|entry| entry.reason.is_none())
            .map(|entry| {
                tracing::debug!(uri = %entry.post.uri, "latest own post");
                into_view(entry.post)
            });
        Ok(latest)
    }
}

/// Prefers the stored record's card over the hydrated view, then falls back to
/// the first link facet. Unparseable URIs count as no link.
fn into_view(post: PostView) -> PublishedPostView {
    let external_link_uri = post
        .record
        .embed
        .as_ref()
        .and_then(|e| e.external.as_ref())
        .or_else(|| post.embed.as_ref().and_then(|e| e.external.as_ref()))
        .map(|x| x.uri.as_str())
        .or_else(|| post.record.first_link())
        .and_then(|uri| Url::parse(uri).ok());
    PublishedPostView {
        raw_text: post.record.text,
        external_link_uri,
    }
}
