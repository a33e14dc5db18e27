//! Cross-run duplicate detection without local state.
//!
//! The only record of what was posted is the account's own timeline, so the
//! guard compares the candidate against the single most recent post. An item
//! that was posted two or more posts ago and resurfaces at the top of the feed
//! is not recognized.
//!
//! Under [`DedupStrategy::Text`] every post opens with a headline line built
//! from the item title, so the key read back from the first line does not
//! depend on the generated caption.

use feedpost_core::{DedupStrategy, FeedItem, PublishedPostView};

use crate::caption::enforce;

/// Characters of text compared by [`DedupStrategy::Text`].
pub const TEXT_KEY_CHARS: usize = 64;

/// Upper bound on the headline line; must leave [`TEXT_KEY_CHARS`] intact when
/// the title is cut.
pub const HEADLINE_MAX_CHARS: usize = 100;

/// Between the headline line and the caption.
pub const HEADLINE_SEPARATOR: &str = "\n\n";

/// Normalized value two posts are compared by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonKey(String);

impl ComparisonKey {
    fn from_normalized(value: String) -> Option<Self> {
        if value.is_empty() {
            None
        } else {
            Some(Self(value))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DuplicateGuard {
    strategy: DedupStrategy,
}

impl DuplicateGuard {
    #[must_use]
    pub fn new(strategy: DedupStrategy) -> Self {
        Self { strategy }
    }

    #[must_use]
    pub fn strategy(&self) -> DedupStrategy {
        self.strategy
    }

    #[must_use]
    pub fn candidate_key(&self, item: &FeedItem) -> Option<ComparisonKey> {
        match self.strategy {
            DedupStrategy::Link => {
                ComparisonKey::from_normalized(item.canonical_link.as_str().trim().to_string())
            }
            DedupStrategy::Text => ComparisonKey::from_normalized(text_prefix(&item.title)),
        }
    }

    #[must_use]
    pub fn published_key(&self, post: &PublishedPostView) -> Option<ComparisonKey> {
        match self.strategy {
            DedupStrategy::Link => post
                .external_link_uri
                .as_ref()
                .and_then(|uri| ComparisonKey::from_normalized(uri.as_str().trim().to_string())),
            DedupStrategy::Text => {
                let first_line = post.raw_text.lines().next().unwrap_or_default();
                ComparisonKey::from_normalized(text_prefix(strip_trailing_url(first_line)))
            }
        }
    }

    /// Line that opens posts under [`DedupStrategy::Text`], whose key equals
    /// [`Self::candidate_key`] for the same item. `None` for the link strategy
    /// or a blank title.
    #[must_use]
    pub fn headline(&self, item: &FeedItem) -> Option<String> {
        match self.strategy {
            DedupStrategy::Link => None,
            DedupStrategy::Text => {
                let collapsed = collapse_whitespace(&item.title);
                if collapsed.is_empty() {
                    None
                } else {
                    Some(enforce(&collapsed, HEADLINE_MAX_CHARS))
                }
            }
        }
    }

    /// Whether `candidate` is the item behind `last_published`.
    ///
    /// Fails open: with no previous post, or when either key cannot be derived,
    /// the candidate is treated as new.
    #[must_use]
    pub fn is_duplicate(
        &self,
        candidate: &FeedItem,
        last_published: Option<&PublishedPostView>,
    ) -> bool {
        let Some(post) = last_published else {
            return false;
        };
        match (self.candidate_key(candidate), self.published_key(post)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

/// Collapse whitespace and keep the first [`TEXT_KEY_CHARS`] characters.
fn text_prefix(text: &str) -> String {
    collapse_whitespace(text).chars().take(TEXT_KEY_CHARS).collect()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Drop a trailing `http(s)://` token, the link appended by inline posts.
fn strip_trailing_url(text: &str) -> &str {
    let trimmed = text.trim_end();
    match trimmed.rsplit_once(char::is_whitespace) {
        Some((head, last)) if is_url_token(last) => head,
        None if is_url_token(trimmed) => "",
        _ => trimmed,
    }
}

fn is_url_token(token: &str) -> bool {
    token.starts_with("https://") || token.starts_with("http://")
}

#[cfg(test)]
mod tests {
    use feedpost_core::Url;

    use super::*;

    fn item(title: &str, link: &str) -> FeedItem {
        FeedItem::new(title, Url::parse(link).unwrap())
    }

    fn embed_post(text: &str, link: &str) -> PublishedPostView {
        PublishedPostView {
            raw_text: text.to_string(),
            external_link_uri: Some(Url::parse(link).unwrap()),
        }
    }

    fn text_post(text: &str) -> PublishedPostView {
        PublishedPostView {
            raw_text: text.to_string(),
            external_link_uri: None,
        }
    }

    #[test]
    fn absent_history_is_never_a_duplicate() {
        for strategy in [DedupStrategy::Link, DedupStrategy::Text] {
            let guard = DuplicateGuard::new(strategy);
            assert!(!guard.is_duplicate(&item("Model X launches", "https://ex.com/a"), None));
        }
    }

    #[test]
    fn link_same_key_is_duplicate() {
        let guard = DuplicateGuard::new(DedupStrategy::Link);
        let candidate = item("Model X launches", "https://ex.com/a");
        let last = embed_post("Totally different caption #AI", "https://ex.com/a");
        assert!(guard.is_duplicate(&candidate, Some(&last)));
    }

    #[test]
    fn link_unrelated_post_is_not_duplicate() {
        let guard = DuplicateGuard::new(DedupStrategy::Link);
        let candidate = item("Model X launches", "https://ex.com/a");
        let last = embed_post("Model X launches", "https://ex.com/b");
        assert!(!guard.is_duplicate(&candidate, Some(&last)));
    }

    #[test]
    fn link_comparison_is_case_sensitive_in_path() {
        let guard = DuplicateGuard::new(DedupStrategy::Link);
        let candidate = item("t", "https://ex.com/Article");
        let last = embed_post("t", "https://ex.com/article");
        assert!(!guard.is_duplicate(&candidate, Some(&last)));
    }

    #[test]
    fn link_strategy_fails_open_on_text_only_post() {
        let guard = DuplicateGuard::new(DedupStrategy::Link);
        let candidate = item("Model X launches", "https://ex.com/a");
        let last = text_post("Model X launches https://ex.com/a");
        assert!(guard.published_key(&last).is_none());
        assert!(!guard.is_duplicate(&candidate, Some(&last)));
    }

    #[test]
    fn only_the_most_recent_post_is_consulted() {
        // Posted two runs ago, then something else was posted: the guard only
        // sees the newer post and lets the old item through again.
        let guard = DuplicateGuard::new(DedupStrategy::Link);
        let resurfaced = item("Model X launches", "https://ex.com/a");
        let most_recent = embed_post("Other news", "https://ex.com/other");
        assert!(!guard.is_duplicate(&resurfaced, Some(&most_recent)));
    }

    #[test]
    fn text_strategy_matches_title_prefixed_posts() {
        let guard = DuplicateGuard::new(DedupStrategy::Text);
        let candidate = item("  Model X   launches ", "https://ex.com/a");
        let last = text_post("Model X launches https://ex.com/a");
        assert!(guard.is_duplicate(&candidate, Some(&last)));
    }

    #[test]
    fn text_strategy_is_defeated_by_changed_caption() {
        let guard = DuplicateGuard::new(DedupStrategy::Text);
        let candidate = item("Model X launches", "https://ex.com/a");
        let last = text_post("Big day: Model X launches https://ex.com/a");
        assert!(!guard.is_duplicate(&candidate, Some(&last)));
    }

    #[test]
    fn text_strategy_compares_bounded_prefix() {
        let guard = DuplicateGuard::new(DedupStrategy::Text);
        let title = "t".repeat(TEXT_KEY_CHARS);
        let candidate = item(&format!("{title} first ending"), "https://ex.com/a");
        let last = text_post(&format!("{title} another ending"));
        assert!(guard.is_duplicate(&candidate, Some(&last)));
    }

    #[test]
    fn text_strategy_keys_on_the_first_line() {
        let guard = DuplicateGuard::new(DedupStrategy::Text);
        let candidate = item("Model X launches", "https://ex.com/a");
        let last = text_post("Model X launches\n\nBig day for AI: a new model is out #AI");
        assert!(guard.is_duplicate(&candidate, Some(&last)));

        let other = text_post("Model Y launches\n\nModel X launches");
        assert!(!guard.is_duplicate(&candidate, Some(&other)));
    }

    #[test]
    fn headline_key_matches_candidate_key() {
        let guard = DuplicateGuard::new(DedupStrategy::Text);
        let long = "long title words ".repeat(12);
        for title in ["  Model X \t launches ", long.as_str()] {
            let candidate = item(title, "https://ex.com/a");
            let headline = guard.headline(&candidate).expect("headline expected");
            assert!(headline.chars().count() <= HEADLINE_MAX_CHARS);
            assert!(!headline.contains('\n'));
            let post = text_post(&format!("{headline}{HEADLINE_SEPARATOR}any caption"));
            assert_eq!(guard.published_key(&post), guard.candidate_key(&candidate));
        }
    }

    #[test]
    fn link_strategy_has_no_headline() {
        let guard = DuplicateGuard::new(DedupStrategy::Link);
        assert!(guard.headline(&item("Model X launches", "https://ex.com/a")).is_none());
    }

    #[test]
    fn text_strategy_fails_open_on_link_only_post() {
        let guard = DuplicateGuard::new(DedupStrategy::Text);
        let last = text_post("https://ex.com/a");
        assert!(guard.published_key(&last).is_none());
        assert!(!guard.is_duplicate(&item("Anything", "https://ex.com/a"), Some(&last)));
    }

    #[test]
    fn strip_trailing_url_keeps_inner_links() {
        assert_eq!(strip_trailing_url("see https://a.com now"), "see https://a.com now");
        assert_eq!(strip_trailing_url("caption https://a.com  "), "caption");
        assert_eq!(strip_trailing_url("plain caption"), "plain caption");
    }
}
