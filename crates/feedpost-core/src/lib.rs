//! Shared domain types and configuration for feedpost.

mod app_config;
pub mod collaborators;
mod config;
pub mod items;
pub mod posts;

pub use app_config::{AppConfig, DedupStrategy, PostMode, ShortenPolicy};
pub use collaborators::{CaptionGenerator, FeedSource, SocialPlatform, UrlShortener};
pub use config::{load_app_config, load_app_config_from_env};
pub use items::FeedItem;
pub use posts::{AssembledPost, LinkFacet, LinkPreview, PublishReceipt, PublishedPostView};
pub use url::Url;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
