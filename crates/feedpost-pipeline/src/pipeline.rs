//! Publish pipeline orchestration.
//!
//! One call to [`PublishPipeline::run`] walks the states
//! `Idle → Fetching → CheckingDuplicate → Generating → Constraining →
//! (Shortening) → Assembling → Publishing → Done`, or stops in
//! `Aborted(reason)`. Collaborator failures never escape as errors; they end
//! the run with a typed [`AbortReason`]. Nothing is retried inside a run: the
//! next scheduled run re-derives the duplicate decision from remote state.
//!
//! Two instances running at once can both pass the duplicate check before
//! either publishes. The platform offers no compare-and-swap, so concurrent
//! runs are unsupported rather than locked.

use feedpost_core::{
    AppConfig, AssembledPost, CaptionGenerator, DedupStrategy, FeedItem, FeedSource, PostMode,
    PublishReceipt, PublishedPostView, ShortenPolicy, SocialPlatform, Url, UrlShortener,
};

use crate::assemble::PostAssembler;
use crate::caption::{constrain, RawCaption};
use crate::dedup::{DuplicateGuard, HEADLINE_SEPARATOR};
use crate::error::{AssembleError, PipelineError};
use crate::prompt::GenerationRequest;
use crate::sanitize::ContentSanitizer;

/// Immutable knobs for one pipeline, taken from [`AppConfig`].
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub handle: String,
    pub caption_max_chars: usize,
    pub platform_limit: usize,
    pub post_mode: PostMode,
    pub dedup_strategy: DedupStrategy,
    pub shorten_policy: ShortenPolicy,
    pub forbidden_patterns: Vec<String>,
    pub hashtags: Vec<String>,
}

impl PipelineSettings {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            handle: config.bluesky_handle.clone(),
            caption_max_chars: config.caption_max_chars,
            platform_limit: config.platform_limit,
            post_mode: config.post_mode,
            dedup_strategy: config.dedup_strategy,
            shorten_policy: config.shorten_policy,
            forbidden_patterns: config.forbidden_patterns.clone(),
            hashtags: config.hashtags.clone(),
        }
    }
}

/// Why a run stopped before `Done`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbortReason {
    /// Required configuration is absent or invalid; fix it before retrying.
    PreconditionMissing(String),
    /// The feed had no item.
    NoContent,
    /// The newest item is the one behind the latest post.
    AlreadyPublished,
    GenerationFailed(String),
    ShortenFailed(String),
    /// The assembled post would not fit the platform limit.
    LengthExceeded { length: usize, limit: usize },
    PublishFailed(String),
}

/// How schedulers and operators should treat an abort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Nothing new to do.
    Benign,
    /// Safe to retry on the next scheduled run.
    Transient,
    /// Configuration must change first.
    Fatal,
    /// A constraint that should always hold did not.
    Bug,
}

impl AbortReason {
    #[must_use]
    pub fn severity(&self) -> Severity {
        match self {
            AbortReason::NoContent | AbortReason::AlreadyPublished => Severity::Benign,
            AbortReason::GenerationFailed(_)
            | AbortReason::ShortenFailed(_)
            | AbortReason::PublishFailed(_) => Severity::Transient,
            AbortReason::PreconditionMissing(_) => Severity::Fatal,
            AbortReason::LengthExceeded { .. } => Severity::Bug,
        }
    }

    /// Process exit code: `1x` benign, `2x` transient, `30` constraint bug,
    /// `78` configuration.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            AbortReason::PreconditionMissing(_) => 78,
            AbortReason::NoContent => 10,
            AbortReason::AlreadyPublished => 11,
            AbortReason::GenerationFailed(_) => 20,
            AbortReason::ShortenFailed(_) => 21,
            AbortReason::PublishFailed(_) => 22,
            AbortReason::LengthExceeded { .. } => 30,
        }
    }
}

impl std::fmt::Display for AbortReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AbortReason::PreconditionMissing(msg) => write!(f, "precondition missing: {msg}"),
            AbortReason::NoContent => write!(f, "no content"),
            AbortReason::AlreadyPublished => write!(f, "already published"),
            AbortReason::GenerationFailed(msg) => write!(f, "generation failed: {msg}"),
            AbortReason::ShortenFailed(msg) => write!(f, "shortening failed: {msg}"),
            AbortReason::LengthExceeded { length, limit } => {
                write!(f, "length exceeded: {length} > {limit}")
            }
            AbortReason::PublishFailed(msg) => write!(f, "publish failed: {msg}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Fetching,
    CheckingDuplicate,
    Generating,
    Constraining,
    Shortening,
    Assembling,
    Publishing,
    Done,
    Aborted(AbortReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Done {
        item: FeedItem,
        post: AssembledPost,
        receipt: PublishReceipt,
    },
    Aborted(AbortReason),
}

impl RunOutcome {
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            RunOutcome::Done { .. } => 0,
            RunOutcome::Aborted(reason) => reason.exit_code(),
        }
    }
}

/// Every state a run visited, in order, plus its terminal outcome.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub states: Vec<RunState>,
    pub outcome: RunOutcome,
}

impl RunReport {
    #[must_use]
    pub fn visited(&self, state: &RunState) -> bool {
        self.states.contains(state)
    }
}

/// Read-only view used by `status`: what a run would see right now.
#[derive(Debug, Clone)]
pub struct StatusReport {
    pub item: Option<FeedItem>,
    pub last_post: Option<PublishedPostView>,
    pub duplicate: bool,
    pub strategy: DedupStrategy,
}

/// Records visited states and logs transitions.
struct RunTrace {
    states: Vec<RunState>,
}

impl RunTrace {
    fn start() -> Self {
        Self {
            states: vec![RunState::Idle],
        }
    }

    fn enter(&mut self, state: RunState) {
        tracing::debug!(?state, "pipeline transition");
        self.states.push(state);
    }

    fn abort(mut self, reason: AbortReason) -> RunReport {
        match reason.severity() {
            Severity::Benign => tracing::info!(%reason, "run finished without publishing"),
            Severity::Transient => {
                tracing::warn!(%reason, "run aborted; next scheduled run will retry");
            }
            Severity::Fatal | Severity::Bug => tracing::error!(%reason, "run aborted"),
        }
        self.states.push(RunState::Aborted(reason.clone()));
        RunReport {
            states: self.states,
            outcome: RunOutcome::Aborted(reason),
        }
    }

    fn finish(mut self, item: FeedItem, post: AssembledPost, receipt: PublishReceipt) -> RunReport {
        tracing::info!(uri = %receipt.uri, link = %item.canonical_link, "post published");
        self.states.push(RunState::Done);
        RunReport {
            states: self.states,
            outcome: RunOutcome::Done {
                item,
                post,
                receipt,
            },
        }
    }
}

pub struct PublishPipeline<F, G, P, S> {
    settings: PipelineSettings,
    feed: F,
    generator: G,
    platform: P,
    shortener: S,
    sanitizer: ContentSanitizer,
    guard: DuplicateGuard,
    assembler: PostAssembler,
}

impl<F, G, P, S> PublishPipeline<F, G, P, S>
where
    F: FeedSource + Sync,
    G: CaptionGenerator + Sync,
    P: SocialPlatform + Sync,
    S: UrlShortener + Sync,
{
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidPattern`] if a forbidden pattern does not
    /// compile.
    pub fn new(
        settings: PipelineSettings,
        feed: F,
        generator: G,
        platform: P,
        shortener: S,
    ) -> Result<Self, PipelineError> {
        let sanitizer = ContentSanitizer::new(&settings.forbidden_patterns)?;
        let guard = DuplicateGuard::new(settings.dedup_strategy);
        let assembler = PostAssembler::new(settings.platform_limit);
        Ok(Self {
            settings,
            feed,
            generator,
            platform,
            shortener,
            sanitizer,
            guard,
            assembler,
        })
    }

    #[must_use]
    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Execute one run to a terminal state.
    #[allow(clippy::too_many_lines)]
    pub async fn run(&self) -> RunReport {
        let mut trace = RunTrace::start();

        trace.enter(RunState::Fetching);
        let item = match self.feed.fetch_latest().await {
            Ok(Some(item)) => item,
            Ok(None) => return trace.abort(AbortReason::NoContent),
            Err(e) => {
                tracing::warn!(error = %e, "feed fetch failed; treating as empty");
                return trace.abort(AbortReason::NoContent);
            }
        };
        tracing::info!(title = %item.title, link = %item.canonical_link, "found article");

        trace.enter(RunState::CheckingDuplicate);
        let last_post = self.last_post().await;
        if self.guard.is_duplicate(&item, last_post.as_ref()) {
            return trace.abort(AbortReason::AlreadyPublished);
        }

        let headline = self.guard.headline(&item);
        let caption_max_chars = self.caption_budget(headline.as_deref());

        trace.enter(RunState::Generating);
        let request = GenerationRequest::new(
            &item,
            caption_max_chars,
            &self.settings.forbidden_patterns,
            &self.settings.hashtags,
        );
        let raw = match self.generator.generate(&request.render_prompt()).await {
            Ok(text) if text.trim().is_empty() => {
                return trace.abort(AbortReason::GenerationFailed(
                    "generator returned empty text".to_string(),
                ));
            }
            Ok(text) => RawCaption { text },
            Err(e) => return trace.abort(AbortReason::GenerationFailed(e.to_string())),
        };

        trace.enter(RunState::Constraining);
        let caption = constrain(&raw, &self.sanitizer, caption_max_chars);
        if caption.as_str().is_empty() {
            return trace.abort(AbortReason::GenerationFailed(
                "caption empty after sanitization".to_string(),
            ));
        }
        if caption.as_str() != raw.text.trim() {
            tracing::debug!(
                raw_len = raw.text.chars().count(),
                final_len = caption.char_len(),
                "caption adjusted by sanitizer or length bound"
            );
        }

        let link = if self.wants_shortening() {
            trace.enter(RunState::Shortening);
            match self.shortener.shorten(&item.canonical_link).await {
                Ok(short) => short,
                Err(e) if self.settings.shorten_policy == ShortenPolicy::Required => {
                    return trace.abort(AbortReason::ShortenFailed(e.to_string()));
                }
                Err(e) => {
                    tracing::warn!(error = %e, "shortening failed; using original link");
                    item.canonical_link.clone()
                }
            }
        } else {
            item.canonical_link.clone()
        };

        trace.enter(RunState::Assembling);
        let post = match self.assembler.assemble(
            &caption,
            headline.as_deref(),
            &link,
            &item.title,
            self.settings.post_mode,
        ) {
            Ok(post) => post,
            Err(AssembleError::LengthExceeded { length, limit }) => {
                return trace.abort(AbortReason::LengthExceeded { length, limit });
            }
        };

        trace.enter(RunState::Publishing);
        match self.platform.publish(&post).await {
            Ok(receipt) => trace.finish(item, post, receipt),
            Err(e) => trace.abort(AbortReason::PublishFailed(e.to_string())),
        }
    }

    /// Fetch the newest item and latest post and report the guard's decision,
    /// without generating or publishing anything.
    pub async fn status(&self) -> StatusReport {
        let item = match self.feed.fetch_latest().await {
            Ok(item) => item,
            Err(e) => {
                tracing::warn!(error = %e, "feed fetch failed");
                None
            }
        };
        let last_post = self.last_post().await;
        let duplicate = item
            .as_ref()
            .is_some_and(|i| self.guard.is_duplicate(i, last_post.as_ref()));
        StatusReport {
            item,
            last_post,
            duplicate,
            strategy: self.guard.strategy(),
        }
    }

    /// Latest post on the account; a failed read fails open as "no history".
    async fn last_post(&self) -> Option<PublishedPostView> {
        match self.platform.latest_post(&self.settings.handle).await {
            Ok(post) => post,
            Err(e) => {
                tracing::warn!(
                    handle = %self.settings.handle,
                    error = %e,
                    "could not read latest post; assuming no history"
                );
                None
            }
        }
    }

    /// Caption bound once a headline line has taken its share of the platform
    /// limit.
    fn caption_budget(&self, headline: Option<&str>) -> usize {
        let reserved = headline.map_or(0, |h| {
            h.chars().count() + HEADLINE_SEPARATOR.chars().count()
        });
        self.settings
            .caption_max_chars
            .min(self.settings.platform_limit.saturating_sub(reserved))
    }

    fn wants_shortening(&self) -> bool {
        self.settings.post_mode == PostMode::TextWithInlineLink
            && self.settings.shorten_policy != ShortenPolicy::Disabled
    }
}

/// Shortener used when none is configured; always returns the input.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoShortener;

impl UrlShortener for NoShortener {
    type Error = std::convert::Infallible;

    async fn shorten(&self, url: &Url) -> Result<Url, Self::Error> {
        Ok(url.clone())
    }
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
