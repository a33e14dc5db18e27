use std::time::Duration;

use feedpost_core::{AssembledPost, PublishReceipt, PublishedPostView, SocialPlatform, Url};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tokio::sync::OnceCell;

use crate::error::BlueskyError;
use crate::retry::{retry_with_backoff, RetryClass};
use crate::types::{CreateSessionRequest, Session, XrpcErrorBody};

const BACKOFF_BASE_MS: u64 = 1_000;
const CREATE_SESSION: &str = "com.atproto.server.createSession";

/// XRPC client for one account on one PDS.
///
/// The session is created on first use and kept for the lifetime of the
/// client. Build a fresh client per run.
pub struct BlueskyClient {
    pub(crate) client: Client,
    service: Url,
    identifier: String,
    password: String,
    session: OnceCell<Session>,
    pub(crate) max_retries: u32,
    pub(crate) backoff_base_ms: u64,
}

impl BlueskyClient {
    /// Creates a client against `service` (`https://bsky.social` for most
    /// accounts) authenticating as `identifier` with an app password.
    ///
    /// # Errors
    ///
    /// Returns [`BlueskyError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        service: Url,
        identifier: &str,
        password: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, BlueskyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            service,
            identifier: identifier.to_owned(),
            password: password.to_owned(),
            session: OnceCell::new(),
            max_retries: 0,
            backoff_base_ms: BACKOFF_BASE_MS,
        })
    }

    /// Sets how many extra attempts transient failures get.
    #[must_use]
    pub fn with_retries(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.backoff_base_ms = backoff_base_ms;
        self
    }

    #[must_use]
    pub fn service(&self) -> &Url {
        &self.service
    }

    pub(crate) fn endpoint(&self, method: &str) -> String {
        format!(
            "{}/xrpc/{method}",
            self.service.as_str().trim_end_matches('/')
        )
    }

    /// Returns the cached session, logging in on first call.
    pub(crate) async fn session(&self) -> Result<&Session, BlueskyError> {
        self.session.get_or_try_init(|| self.create_session()).await
    }

    async fn create_session(&self) -> Result<Session, BlueskyError> {
        let url = self.endpoint(CREATE_SESSION);
        let body = CreateSessionRequest {
            identifier: &self.identifier,
            password: &self.password,
        };
        let session: Session =
            retry_with_backoff(RetryClass::Read, self.max_retries, self.backoff_base_ms, || {
                self.send_json(CREATE_SESSION, self.client.post(&url).json(&body))
            })
            .await?;
        tracing::info!(
            did = %session.did,
            handle = session.handle.as_deref().unwrap_or(&self.identifier),
            "Bluesky session created"
        );
        Ok(session)
    }

    /// Sends `request` and decodes a 2xx JSON body.
    ///
    /// # Errors
    ///
    /// - [`BlueskyError::Xrpc`] on a non-2xx status.
    /// - [`BlueskyError::Http`] on network failure.
    /// - [`BlueskyError::Deserialize`] if the body does not match `T`.
    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        method: &'static str,
        request: RequestBuilder,
    ) -> Result<T, BlueskyError> {
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            let body: XrpcErrorBody = serde_json::from_str(&text).unwrap_or_default();
            return Err(BlueskyError::Xrpc {
                method,
                status: status.as_u16(),
                error: body.error,
                message: body.message,
            });
        }
        serde_json::from_str(&text).map_err(|e| BlueskyError::Deserialize {
            context: method.to_string(),
            source: e,
        })
    }
}

impl SocialPlatform for BlueskyClient {
    type Error = BlueskyError;

    async fn latest_post(&self, handle: &str) -> Result<Option<PublishedPostView>, Self::Error> {
        self.latest_own_post(handle).await
    }

    async fn publish(&self, post: &AssembledPost) -> Result<PublishReceipt, Self::Error> {
        self.create_post(post).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_service_and_method() {
        let client = BlueskyClient::new(
            Url::parse("https://bsky.social/").unwrap(),
            "bot.bsky.social",
            "app-pass",
            5,
            "feedpost-test",
        )
        .unwrap();
        assert_eq!(
            client.endpoint("app.bsky.feed.getAuthorFeed"),
            "https://bsky.social/xrpc/app.bsky.feed.getAuthorFeed"
        );
    }
}
