//! Shapes exchanged with the social platform: what we read back to detect
//! duplicates and what we hand over to publish.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

/// Minimal read-back of the most recent post on the account.
///
/// Read fresh on every run and never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedPostView {
    pub raw_text: String,
    /// Link the post points at: the external card URI, else the first link
    /// facet URI.
    pub external_link_uri: Option<Url>,
}

/// Platform-rendered card summarizing a URI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkPreview {
    pub uri: Url,
    pub title: String,
    pub description: String,
}

/// Marks a byte range of the post text as a hyperlink.
///
/// Offsets are UTF-8 byte offsets into [`AssembledPost::text`], end-exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkFacet {
    pub byte_start: usize,
    pub byte_end: usize,
    pub uri: Url,
}

/// The final payload handed to the publisher.
///
/// Never longer than the platform limit it was assembled against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssembledPost {
    pub text: String,
    pub embed: Option<LinkPreview>,
    pub link_facet: Option<LinkFacet>,
}

impl AssembledPost {
    /// Rendered length in characters.
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Acknowledgement returned by the platform after a successful publish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishReceipt {
    pub uri: String,
    pub cid: String,
    pub created_at: DateTime<Utc>,
}
