use url::Url;

/// How the link travels with the caption.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostMode {
    /// Caption only; the link does not appear at all.
    TextOnly,
    /// Caption as the body, link carried only in the preview card.
    TextWithEmbed,
    /// Caption followed by the (possibly shortened) link in the body.
    TextWithInlineLink,
}

impl std::fmt::Display for PostMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PostMode::TextOnly => write!(f, "text"),
            PostMode::TextWithEmbed => write!(f, "embed"),
            PostMode::TextWithInlineLink => write!(f, "inline"),
        }
    }
}

/// Which comparison key the duplicate guard derives.
///
/// A deployment must stick to one strategy: switching between runs compares
/// keys of different kinds and silently disables deduplication.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DedupStrategy {
    /// Item link vs. the link the last post points at (card or unshortened
    /// inline link).
    Link,
    /// Item title prefix vs. the first line of the last post. Posts lead with
    /// the title as a headline line so the key survives a new caption.
    Text,
}

impl std::fmt::Display for DedupStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DedupStrategy::Link => write!(f, "link"),
            DedupStrategy::Text => write!(f, "text"),
        }
    }
}

/// What a shortener failure means for the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortenPolicy {
    /// Never call the shortener.
    Disabled,
    /// Use the original link when shortening fails.
    FallBack,
    /// Abort the run when shortening fails.
    Required,
}

impl std::fmt::Display for ShortenPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShortenPolicy::Disabled => write!(f, "disabled"),
            ShortenPolicy::FallBack => write!(f, "fallback"),
            ShortenPolicy::Required => write!(f, "required"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub bluesky_handle: String,
    pub bluesky_app_password: String,
    pub gemini_api_key: String,
    pub feed_url: Url,
    pub bluesky_service: Url,
    pub gemini_model: String,
    pub gemini_base_url: Url,
    pub caption_max_chars: usize,
    pub platform_limit: usize,
    pub post_mode: PostMode,
    pub dedup_strategy: DedupStrategy,
    pub shorten_policy: ShortenPolicy,
    pub shortener_url: Url,
    pub forbidden_patterns: Vec<String>,
    pub hashtags: Vec<String>,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub max_retries: u32,
    pub log_level: String,
    pub schedule: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("bluesky_handle", &self.bluesky_handle)
            .field("bluesky_app_password", &"[redacted]")
            .field("gemini_api_key", &"[redacted]")
            .field("feed_url", &self.feed_url.as_str())
            .field("bluesky_service", &self.bluesky_service.as_str())
            .field("gemini_model", &self.gemini_model)
            .field("gemini_base_url", &self.gemini_base_url.as_str())
            .field("caption_max_chars", &self.caption_max_chars)
            .field("platform_limit", &self.platform_limit)
            .field("post_mode", &self.post_mode)
            .field("dedup_strategy", &self.dedup_strategy)
            .field("shorten_policy", &self.shorten_policy)
            .field("shortener_url", &self.shortener_url.as_str())
            .field("forbidden_patterns", &self.forbidden_patterns)
            .field("hashtags", &self.hashtags)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_retries", &self.max_retries)
            .field("log_level", &self.log_level)
            .field("schedule", &self.schedule)
            .finish()
    }
}
