use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

/// Returns a map with all required env vars populated.
fn full_env<'a>() -> HashMap<&'a str, &'a str> {
    let mut m = HashMap::new();
    m.insert("BLUESKY_HANDLE", "newsbot.bsky.social");
    m.insert("BLUESKY_APP_PASSWORD", "abcd-efgh-ijkl-mnop");
    m.insert("GEMINI_API_KEY", "test-gemini-key");
    m
}

#[test]
fn build_app_config_fails_without_handle() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "BLUESKY_HANDLE"),
        "expected MissingEnvVar(BLUESKY_HANDLE), got: {result:?}"
    );
}

#[test]
fn build_app_config_fails_without_app_password() {
    let mut map = full_env();
    map.remove("BLUESKY_APP_PASSWORD");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "BLUESKY_APP_PASSWORD"),
        "expected MissingEnvVar(BLUESKY_APP_PASSWORD), got: {result:?}"
    );
}

#[test]
fn build_app_config_treats_blank_gemini_key_as_missing() {
    let mut map = full_env();
    map.insert("GEMINI_API_KEY", "   ");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "GEMINI_API_KEY"),
        "expected MissingEnvVar(GEMINI_API_KEY), got: {result:?}"
    );
}

#[test]
fn build_app_config_succeeds_with_all_required_vars() {
    let map = full_env();
    let cfg = build_app_config(lookup_from_map(&map)).expect("config should build");
    assert_eq!(cfg.bluesky_handle, "newsbot.bsky.social");
    assert_eq!(cfg.bluesky_service.as_str(), "https://bsky.social/");
    assert_eq!(cfg.gemini_model, "gemini-1.5-flash");
    assert_eq!(cfg.caption_max_chars, 240);
    assert_eq!(cfg.platform_limit, 300);
    assert_eq!(cfg.post_mode, PostMode::TextWithEmbed);
    assert_eq!(cfg.dedup_strategy, DedupStrategy::Link);
    assert_eq!(cfg.shorten_policy, ShortenPolicy::FallBack);
    assert_eq!(cfg.forbidden_patterns, vec!["^@".to_string()]);
    assert_eq!(cfg.hashtags, vec!["#AI".to_string(), "#TechNews".to_string()]);
    assert_eq!(cfg.request_timeout_secs, 30);
    assert_eq!(cfg.max_retries, 2);
    assert_eq!(cfg.log_level, "info");
    assert!(cfg.feed_url.as_str().starts_with("https://news.google.com/rss/search"));
}

#[test]
fn debug_output_redacts_secrets() {
    let map = full_env();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("abcd-efgh-ijkl-mnop"));
    assert!(!rendered.contains("test-gemini-key"));
    assert!(rendered.contains("[redacted]"));
}

#[test]
fn post_mode_override() {
    let mut map = full_env();
    map.insert("FEEDPOST_POST_MODE", "inline");
    map.insert("FEEDPOST_DEDUP_STRATEGY", "text");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.post_mode, PostMode::TextWithInlineLink);
}

#[test]
fn link_dedup_requires_embed_mode() {
    let mut map = full_env();
    map.insert("FEEDPOST_POST_MODE", "text");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, ref reason })
            if var == "FEEDPOST_DEDUP_STRATEGY" && reason.contains("text posts")),
        "expected InvalidEnvVar(FEEDPOST_DEDUP_STRATEGY), got: {result:?}"
    );
}

#[test]
fn link_dedup_rejects_shortened_inline_links() {
    let mut map = full_env();
    map.insert("FEEDPOST_POST_MODE", "inline");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, ref reason })
            if var == "FEEDPOST_DEDUP_STRATEGY" && reason.contains("FEEDPOST_SHORTEN_POLICY=disabled")),
        "expected InvalidEnvVar(FEEDPOST_DEDUP_STRATEGY), got: {result:?}"
    );
}

#[test]
fn link_dedup_accepts_unshortened_inline_links() {
    let mut map = full_env();
    map.insert("FEEDPOST_POST_MODE", "inline");
    map.insert("FEEDPOST_SHORTEN_POLICY", "disabled");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.post_mode, PostMode::TextWithInlineLink);
    assert_eq!(cfg.dedup_strategy, DedupStrategy::Link);
    assert_eq!(cfg.shorten_policy, ShortenPolicy::Disabled);
}

#[test]
fn blank_optional_vars_fall_back_to_defaults() {
    let mut map = full_env();
    map.insert("FEEDPOST_POST_MODE", "");
    map.insert("FEEDPOST_DEDUP_STRATEGY", "  ");
    map.insert("FEEDPOST_CAPTION_MAX_CHARS", "");
    map.insert("FEEDPOST_USER_AGENT", "");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.post_mode, PostMode::TextWithEmbed);
    assert_eq!(cfg.dedup_strategy, DedupStrategy::Link);
    assert_eq!(cfg.caption_max_chars, 240);
    assert_eq!(cfg.user_agent, "feedpost/0.1 (news-bot)");
}

#[test]
fn post_mode_invalid() {
    let mut map = full_env();
    map.insert("FEEDPOST_POST_MODE", "carousel");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "FEEDPOST_POST_MODE"),
        "expected InvalidEnvVar(FEEDPOST_POST_MODE), got: {result:?}"
    );
}

#[test]
fn dedup_strategy_text_override() {
    let mut map = full_env();
    map.insert("FEEDPOST_DEDUP_STRATEGY", "text");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.dedup_strategy, DedupStrategy::Text);
}

#[test]
fn shorten_policy_invalid() {
    let mut map = full_env();
    map.insert("FEEDPOST_SHORTEN_POLICY", "sometimes");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "FEEDPOST_SHORTEN_POLICY"),
        "expected InvalidEnvVar(FEEDPOST_SHORTEN_POLICY), got: {result:?}"
    );
}

#[test]
fn caption_max_chars_below_ellipsis_minimum_is_rejected() {
    let mut map = full_env();
    map.insert("FEEDPOST_CAPTION_MAX_CHARS", "3");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "FEEDPOST_CAPTION_MAX_CHARS"),
        "expected InvalidEnvVar(FEEDPOST_CAPTION_MAX_CHARS), got: {result:?}"
    );
}

#[test]
fn caption_max_chars_above_platform_limit_is_rejected() {
    let mut map = full_env();
    map.insert("FEEDPOST_CAPTION_MAX_CHARS", "400");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "FEEDPOST_CAPTION_MAX_CHARS"),
        "expected InvalidEnvVar(FEEDPOST_CAPTION_MAX_CHARS), got: {result:?}"
    );
}

#[test]
fn request_timeout_invalid() {
    let mut map = full_env();
    map.insert("FEEDPOST_REQUEST_TIMEOUT_SECS", "not-a-number");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "FEEDPOST_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(FEEDPOST_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn feed_url_invalid() {
    let mut map = full_env();
    map.insert("FEEDPOST_FEED_URL", "not a url");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "FEEDPOST_FEED_URL"),
        "expected InvalidEnvVar(FEEDPOST_FEED_URL), got: {result:?}"
    );
}

#[test]
fn forbidden_patterns_must_compile() {
    let mut map = full_env();
    map.insert("FEEDPOST_FORBIDDEN_PATTERNS", "^@,([unclosed");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "FEEDPOST_FORBIDDEN_PATTERNS"),
        "expected InvalidEnvVar(FEEDPOST_FORBIDDEN_PATTERNS), got: {result:?}"
    );
}

#[test]
fn forbidden_patterns_override_drops_blanks() {
    let mut map = full_env();
    map.insert("FEEDPOST_FORBIDDEN_PATTERNS", "^@, ,^\\$");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(
        cfg.forbidden_patterns,
        vec!["^@".to_string(), "^\\$".to_string()]
    );
}

#[test]
fn split_list_handles_empty_input() {
    assert!(split_list("").is_empty());
    assert!(split_list(" , ,").is_empty());
}
