use url::Url;

use crate::app_config::{AppConfig, DedupStrategy, PostMode, ShortenPolicy};
use crate::ConfigError;

const DEFAULT_FEED_URL: &str =
    "https://news.google.com/rss/search?q=artificial+intelligence&hl=en-US&gl=US&ceid=US:en";

/// Smallest caption budget that still fits one character plus the ellipsis.
const MIN_CAPTION_CHARS: usize = 4;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can feed a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        match lookup(var) {
            Ok(v) if !v.trim().is_empty() => Ok(v),
            _ => Err(ConfigError::MissingEnvVar(var.to_string())),
        }
    };

    // Blank counts as unset, as with `require`.
    let or_default = |var: &str, default: &str| -> String {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| default.to_string())
    };

    let parse_url = |var: &str, default: &str| -> Result<Url, ConfigError> {
        let raw = or_default(var, default);
        Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let bluesky_handle = require("BLUESKY_HANDLE")?;
    let bluesky_app_password = require("BLUESKY_APP_PASSWORD")?;
    let gemini_api_key = require("GEMINI_API_KEY")?;

    let feed_url = parse_url("FEEDPOST_FEED_URL", DEFAULT_FEED_URL)?;
    let bluesky_service = parse_url("FEEDPOST_BLUESKY_SERVICE", "https://bsky.social")?;
    let gemini_model = or_default("FEEDPOST_GEMINI_MODEL", "gemini-1.5-flash");
    let gemini_base_url = parse_url(
        "FEEDPOST_GEMINI_BASE_URL",
        "https://generativelanguage.googleapis.com",
    )?;

    let caption_max_chars = parse_usize("FEEDPOST_CAPTION_MAX_CHARS", "240")?;
    let platform_limit = parse_usize("FEEDPOST_PLATFORM_LIMIT", "300")?;
    if caption_max_chars < MIN_CAPTION_CHARS {
        return Err(ConfigError::InvalidEnvVar {
            var: "FEEDPOST_CAPTION_MAX_CHARS".to_string(),
            reason: format!("must be at least {MIN_CAPTION_CHARS}"),
        });
    }
    if caption_max_chars > platform_limit {
        return Err(ConfigError::InvalidEnvVar {
            var: "FEEDPOST_CAPTION_MAX_CHARS".to_string(),
            reason: format!("exceeds FEEDPOST_PLATFORM_LIMIT ({platform_limit})"),
        });
    }

    let post_mode = parse_post_mode(&or_default("FEEDPOST_POST_MODE", "embed"))?;
    let dedup_strategy = parse_dedup_strategy(&or_default("FEEDPOST_DEDUP_STRATEGY", "link"))?;
    let shorten_policy = parse_shorten_policy(&or_default("FEEDPOST_SHORTEN_POLICY", "fallback"))?;
    if dedup_strategy == DedupStrategy::Link && !carries_canonical_link(post_mode, shorten_policy) {
        return Err(ConfigError::InvalidEnvVar {
            var: "FEEDPOST_DEDUP_STRATEGY".to_string(),
            reason: if post_mode == PostMode::TextOnly {
                "link deduplication needs the item link on the post, and text posts carry none; \
                 use FEEDPOST_DEDUP_STRATEGY=text"
                    .to_string()
            } else {
                "link deduplication needs the original link on the post, and a shortened \
                 inline link replaces it; set FEEDPOST_SHORTEN_POLICY=disabled or use \
                 FEEDPOST_DEDUP_STRATEGY=text"
                    .to_string()
            },
        });
    }
    let shortener_url = parse_url("FEEDPOST_SHORTENER_URL", "https://is.gd/create.php")?;

    let forbidden_patterns = split_list(&or_default("FEEDPOST_FORBIDDEN_PATTERNS", "^@"));
    for pattern in &forbidden_patterns {
        regex::Regex::new(pattern).map_err(|e| ConfigError::InvalidEnvVar {
            var: "FEEDPOST_FORBIDDEN_PATTERNS".to_string(),
            reason: format!("{pattern}: {e}"),
        })?;
    }
    let hashtags = split_list(&or_default("FEEDPOST_HASHTAGS", "#AI,#TechNews"));

    let request_timeout_secs = parse_u64("FEEDPOST_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("FEEDPOST_USER_AGENT", "feedpost/0.1 (news-bot)");
    let max_retries = parse_u32("FEEDPOST_MAX_RETRIES", "2")?;
    let log_level = or_default("FEEDPOST_LOG_LEVEL", "info");
    let schedule = or_default("FEEDPOST_SCHEDULE", "0 0 * * * *");

    Ok(AppConfig {
        bluesky_handle,
        bluesky_app_password,
        gemini_api_key,
        feed_url,
        bluesky_service,
        gemini_model,
        gemini_base_url,
        caption_max_chars,
        platform_limit,
        post_mode,
        dedup_strategy,
        shorten_policy,
        shortener_url,
        forbidden_patterns,
        hashtags,
        request_timeout_secs,
        user_agent,
        max_retries,
        log_level,
        schedule,
    })
}

fn parse_post_mode(s: &str) -> Result<PostMode, ConfigError> {
    match s.trim() {
        "text" => Ok(PostMode::TextOnly),
        "embed" => Ok(PostMode::TextWithEmbed),
        "inline" => Ok(PostMode::TextWithInlineLink),
        other => Err(ConfigError::InvalidEnvVar {
            var: "FEEDPOST_POST_MODE".to_string(),
            reason: format!("expected text, embed or inline; got {other:?}"),
        }),
    }
}

fn parse_dedup_strategy(s: &str) -> Result<DedupStrategy, ConfigError> {
    match s.trim() {
        "link" => Ok(DedupStrategy::Link),
        "text" => Ok(DedupStrategy::Text),
        other => Err(ConfigError::InvalidEnvVar {
            var: "FEEDPOST_DEDUP_STRATEGY".to_string(),
            reason: format!("expected link or text; got {other:?}"),
        }),
    }
}

fn parse_shorten_policy(s: &str) -> Result<ShortenPolicy, ConfigError> {
    match s.trim() {
        "disabled" => Ok(ShortenPolicy::Disabled),
        "fallback" => Ok(ShortenPolicy::FallBack),
        "required" => Ok(ShortenPolicy::Required),
        other => Err(ConfigError::InvalidEnvVar {
            var: "FEEDPOST_SHORTEN_POLICY".to_string(),
            reason: format!("expected disabled, fallback or required; got {other:?}"),
        }),
    }
}

/// Whether a published post keeps the item's original link where the read-back
/// can see it: the card of an embed, or the facet of an unshortened inline link.
fn carries_canonical_link(mode: PostMode, policy: ShortenPolicy) -> bool {
    match mode {
        PostMode::TextWithEmbed => true,
        PostMode::TextWithInlineLink => policy == ShortenPolicy::Disabled,
        PostMode::TextOnly => false,
    }
}

/// Split a comma-separated value, dropping blanks.
fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
