use serde::{Deserialize, Serialize};
use url::Url;

/// The newest entry of the news feed, the only item a run considers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedItem {
    pub title: String,
    pub canonical_link: Url,
}

impl FeedItem {
    #[must_use]
    pub fn new(title: impl Into<String>, canonical_link: Url) -> Self {
        Self {
            title: title.into(),
            canonical_link,
        }
    }
}
