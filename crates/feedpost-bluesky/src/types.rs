//! XRPC request and response shapes for the endpoints the client calls.
//!
//! Only the fields the publisher reads are modelled; everything else in the
//! lexicon is ignored on deserialization.

use serde::{Deserialize, Serialize};

pub const POST_COLLECTION: &str = "app.bsky.feed.post";
pub const EXTERNAL_EMBED_TYPE: &str = "app.bsky.embed.external";
pub const LINK_FEATURE_TYPE: &str = "app.bsky.richtext.facet#link";

// --- com.atproto.server.createSession ---

#[derive(Debug, Serialize)]
pub struct CreateSessionRequest<'a> {
    pub identifier: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub access_jwt: String,
    pub did: String,
    #[serde(default)]
    pub handle: Option<String>,
}

// --- app.bsky.feed.getAuthorFeed ---

#[derive(Debug, Deserialize)]
pub struct AuthorFeedResponse {
    #[serde(default)]
    pub feed: Vec<FeedViewPost>,
}

#[derive(Debug, Deserialize)]
pub struct FeedViewPost {
    pub post: PostView,
    /// Present for reposts and pinned entries; absent for the author's own
    /// chronological posts.
    #[serde(default)]
    pub reason: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct PostView {
    pub uri: String,
    #[serde(default)]
    pub record: PostRecordView,
    /// Hydrated embed (`app.bsky.embed.external#view`).
    #[serde(default)]
    pub embed: Option<EmbedView>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PostRecordView {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub embed: Option<EmbedView>,
    #[serde(default)]
    pub facets: Vec<FacetView>,
}

impl PostRecordView {
    /// URI of the first link feature, in facet order.
    #[must_use]
    pub fn first_link(&self) -> Option<&str> {
        self.facets
            .iter()
            .flat_map(|facet| &facet.features)
            .find(|feature| feature.feature_type == LINK_FEATURE_TYPE)
            .and_then(|feature| feature.uri.as_deref())
    }
}

#[derive(Debug, Deserialize)]
pub struct FacetView {
    #[serde(default)]
    pub features: Vec<FeatureView>,
}

/// Mentions and tags share the list with links; only links carry `uri`.
#[derive(Debug, Deserialize)]
pub struct FeatureView {
    #[serde(rename = "$type", default)]
    pub feature_type: String,
    #[serde(default)]
    pub uri: Option<String>,
}

/// Both the stored record embed and the hydrated view put the card under
/// `external`; other embed kinds simply lack it.
#[derive(Debug, Deserialize)]
pub struct EmbedView {
    #[serde(default)]
    pub external: Option<ExternalRef>,
}

#[derive(Debug, Deserialize)]
pub struct ExternalRef {
    pub uri: String,
}

// --- com.atproto.repo.createRecord ---

#[derive(Debug, Serialize)]
pub struct CreateRecordRequest<'a> {
    pub repo: &'a str,
    pub collection: &'static str,
    pub record: PostRecord<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRecord<'a> {
    #[serde(rename = "$type")]
    pub record_type: &'static str,
    pub text: &'a str,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embed: Option<ExternalEmbed<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub facets: Vec<Facet<'a>>,
}

#[derive(Debug, Serialize)]
pub struct ExternalEmbed<'a> {
    #[serde(rename = "$type")]
    pub embed_type: &'static str,
    pub external: External<'a>,
}

#[derive(Debug, Serialize)]
pub struct External<'a> {
    pub uri: &'a str,
    pub title: &'a str,
    pub description: &'a str,
}

#[derive(Debug, Serialize)]
pub struct Facet<'a> {
    pub index: ByteSlice,
    pub features: Vec<LinkFeature<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ByteSlice {
    pub byte_start: usize,
    pub byte_end: usize,
}

#[derive(Debug, Serialize)]
pub struct LinkFeature<'a> {
    #[serde(rename = "$type")]
    pub feature_type: &'static str,
    pub uri: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct CreateRecordResponse {
    pub uri: String,
    pub cid: String,
}

/// `{"error": "ExpiredToken", "message": "Token has expired"}`
#[derive(Debug, Default, Deserialize)]
pub struct XrpcErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_serializes_lexicon_field_names() {
        let record = PostRecord {
            record_type: POST_COLLECTION,
            text: "Model X is here https://ex.com/a",
            created_at: "2026-01-01T00:00:00.000Z".to_string(),
            embed: None,
            facets: vec![Facet {
                index: ByteSlice {
                    byte_start: 16,
                    byte_end: 32,
                },
                features: vec![LinkFeature {
                    feature_type: LINK_FEATURE_TYPE,
                    uri: "https://ex.com/a",
                }],
            }],
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["$type"], "app.bsky.feed.post");
        assert_eq!(value["createdAt"], "2026-01-01T00:00:00.000Z");
        assert!(value.get("embed").is_none());
        assert_eq!(value["facets"][0]["index"]["byteStart"], 16);
        assert_eq!(value["facets"][0]["index"]["byteEnd"], 32);
        assert_eq!(
            value["facets"][0]["features"][0]["$type"],
            "app.bsky.richtext.facet#link"
        );
    }

    #[test]
    fn record_without_facets_omits_the_field() {
        let record = PostRecord {
            record_type: POST_COLLECTION,
            text: "caption",
            created_at: "2026-01-01T00:00:00.000Z".to_string(),
            embed: Some(ExternalEmbed {
                embed_type: EXTERNAL_EMBED_TYPE,
                external: External {
                    uri: "https://ex.com/a",
                    title: "Model X launches",
                    description: "",
                },
            }),
            facets: Vec::new(),
        };
        let value = serde_json::to_value(&record).unwrap();
        assert!(value.get("facets").is_none());
        assert_eq!(value["embed"]["$type"], "app.bsky.embed.external");
        assert_eq!(value["embed"]["external"]["title"], "Model X launches");
    }

    #[test]
    fn author_feed_reads_record_and_view_embeds() {
        let body = r#"{
            "feed": [{
                "post": {
                    "uri": "at://did:plc:abc/app.bsky.feed.post/1",
                    "cid": "bafy",
                    "record": {
                        "$type": "app.bsky.feed.post",
                        "text": "Model X is here",
                        "embed": {"$type": "app.bsky.embed.external",
                                  "external": {"uri": "https://ex.com/a", "title": "t", "description": ""}}
                    },
                    "embed": {"$type": "app.bsky.embed.external#view",
                              "external": {"uri": "https://ex.com/a", "title": "t", "description": ""}}
                }
            }],
            "cursor": "abc"
        }"#;
        let resp: AuthorFeedResponse = serde_json::from_str(body).unwrap();
        let post = &resp.feed[0].post;
        assert_eq!(post.record.text, "Model X is here");
        assert_eq!(
            post.record
                .embed
                .as_ref()
                .and_then(|e| e.external.as_ref())
                .map(|x| x.uri.as_str()),
            Some("https://ex.com/a")
        );
        assert!(resp.feed[0].reason.is_none());
    }

    #[test]
    fn image_embed_has_no_external() {
        let body = r#"{"$type": "app.bsky.embed.images", "images": []}"#;
        let embed: EmbedView = serde_json::from_str(body).unwrap();
        assert!(embed.external.is_none());
    }
}
