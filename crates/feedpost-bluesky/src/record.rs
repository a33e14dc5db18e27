//! `app.bsky.feed.post` record creation.

use chrono::{DateTime, SecondsFormat, Utc};
use feedpost_core::{AssembledPost, PublishReceipt};

use crate::client::BlueskyClient;
use crate::error::BlueskyError;
use crate::retry::{retry_with_backoff, RetryClass};
use crate::types::{
    ByteSlice, CreateRecordRequest, CreateRecordResponse, External, ExternalEmbed, Facet,
    LinkFeature, PostRecord, EXTERNAL_EMBED_TYPE, LINK_FEATURE_TYPE, POST_COLLECTION,
};

const CREATE_RECORD: &str = "com.atproto.repo.createRecord";

impl BlueskyClient {
    /// Publishes `post` to the logged-in account's repository.
    ///
    /// # Errors
    ///
    /// - [`BlueskyError::Xrpc`] if login or record creation is rejected.
    /// - [`BlueskyError::Http`] on network failure.
    /// - [`BlueskyError::Deserialize`] if the response shape is unexpected.
    pub async fn create_post(&self, post: &AssembledPost) -> Result<PublishReceipt, BlueskyError> {
        let session = self.session().await?;
        let created_at = Utc::now();
        let request = CreateRecordRequest {
            repo: &session.did,
            collection: POST_COLLECTION,
            record: build_record(post, created_at),
        };
        let url = self.endpoint(CREATE_RECORD);
        let created: CreateRecordResponse =
            retry_with_backoff(RetryClass::Write, self.max_retries, self.backoff_base_ms, || {
                self.send_json(
                    CREATE_RECORD,
                    self.client
                        .post(&url)
                        .bearer_auth(&session.access_jwt)
                        .json(&request),
                )
            })
            .await?;
        tracing::info!(uri = %created.uri, cid = %created.cid, "post record created");
        Ok(PublishReceipt {
            uri: created.uri,
            cid: created.cid,
            created_at,
        })
    }
}

pub(crate) fn build_record(post: &AssembledPost, created_at: DateTime<Utc>) -> PostRecord<'_> {
    let embed = post.embed.as_ref().map(|preview| ExternalEmbed {
        embed_type: EXTERNAL_EMBED_TYPE,
        external: External {
            uri: preview.uri.as_str(),
            title: &preview.title,
            description: &preview.description,
        },
    });
    let facets = post
        .link_facet
        .iter()
        .map(|facet| Facet {
            index: ByteSlice {
                byte_start: facet.byte_start,
                byte_end: facet.byte_end,
            },
            features: vec![LinkFeature {
                feature_type: LINK_FEATURE_TYPE,
                uri: facet.uri.as_str(),
            }],
        })
        .collect();
    PostRecord {
        record_type: POST_COLLECTION,
        text: &post.text,
        created_at: created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        embed,
        facets,
    }
}
