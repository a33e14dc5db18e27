//! Wires the HTTP adapters into a [`PublishPipeline`] for one invocation.

use anyhow::Context;
use feedpost_bluesky::BlueskyClient;
use feedpost_core::AppConfig;
use feedpost_feed::RssFeedClient;
use feedpost_gemini::GeminiClient;
use feedpost_pipeline::{
    DryRunPlatform, PipelineSettings, PublishPipeline, RunOutcome, RunReport, StatusReport,
};
use feedpost_shortener::IsGdShortener;

const BACKOFF_BASE_MS: u64 = 1_000;

/// Adapters are rebuilt per run so every run logs in and reads remote state
/// afresh.
struct Adapters {
    feed: RssFeedClient,
    generator: GeminiClient,
    platform: BlueskyClient,
    shortener: IsGdShortener,
}

impl Adapters {
    fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let timeout = config.request_timeout_secs;
        let feed = RssFeedClient::new(config.feed_url.clone(), timeout, &config.user_agent)
            .context("building feed client")?;
        let generator = GeminiClient::new(
            &config.gemini_api_key,
            &config.gemini_model,
            config.gemini_base_url.clone(),
            timeout,
            &config.user_agent,
        )
        .context("building Gemini client")?
        .with_retries(config.max_retries, BACKOFF_BASE_MS);
        let platform = BlueskyClient::new(
            config.bluesky_service.clone(),
            &config.bluesky_handle,
            &config.bluesky_app_password,
            timeout,
            &config.user_agent,
        )
        .context("building Bluesky client")?
        .with_retries(config.max_retries, BACKOFF_BASE_MS);
        let shortener =
            IsGdShortener::new(config.shortener_url.clone(), timeout, &config.user_agent)
                .context("building shortener client")?;
        Ok(Self {
            feed,
            generator,
            platform,
            shortener,
        })
    }
}

/// Executes one pipeline run; `dry_run` swaps the publisher for a logger.
///
/// # Errors
///
/// Returns an error only when the adapters or the pipeline cannot be
/// constructed. Every failure during the run is part of the returned
/// [`RunReport`].
pub(crate) async fn run_once(config: &AppConfig, dry_run: bool) -> anyhow::Result<RunReport> {
    let Adapters {
        feed,
        generator,
        platform,
        shortener,
    } = Adapters::from_config(config)?;
    let settings = PipelineSettings::from_config(config);
    let report = if dry_run {
        let platform = DryRunPlatform::new(platform);
        PublishPipeline::new(settings, feed, generator, platform, shortener)?
            .run()
            .await
    } else {
        PublishPipeline::new(settings, feed, generator, platform, shortener)?
            .run()
            .await
    };
    Ok(report)
}

/// Reads what a run would see, without generating or publishing.
///
/// # Errors
///
/// Returns an error when the adapters or the pipeline cannot be constructed.
pub(crate) async fn status(config: &AppConfig) -> anyhow::Result<StatusReport> {
    let Adapters {
        feed,
        generator,
        platform,
        shortener,
    } = Adapters::from_config(config)?;
    let pipeline = PublishPipeline::new(
        PipelineSettings::from_config(config),
        feed,
        generator,
        platform,
        shortener,
    )?;
    Ok(pipeline.status().await)
}

pub(crate) fn format_outcome(outcome: &RunOutcome) -> String {
    match outcome {
        RunOutcome::Done { item, receipt, .. } => {
            format!("published {} ({})", receipt.uri, item.title)
        }
        RunOutcome::Aborted(reason) => format!("aborted: {reason}"),
    }
}

pub(crate) fn format_status(status: &StatusReport) -> String {
    let mut lines = Vec::new();
    match &status.item {
        Some(item) => {
            lines.push(format!("latest item:  {}", item.title));
            lines.push(format!("              {}", item.canonical_link));
        }
        None => lines.push("latest item:  none".to_string()),
    }
    match &status.last_post {
        Some(post) => {
            lines.push(format!("latest post:  {}", post.raw_text.replace('\n', " ")));
            if let Some(uri) = &post.external_link_uri {
                lines.push(format!("              link {uri}"));
            }
        }
        None => lines.push("latest post:  none".to_string()),
    }
    lines.push(format!("dedup:        {}", status.strategy));
    let decision = match (&status.item, status.duplicate) {
        (None, _) => "nothing to post",
        (Some(_), true) => "already published",
        (Some(_), false) => "would publish",
    };
    lines.push(format!("decision:     {decision}"));

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
