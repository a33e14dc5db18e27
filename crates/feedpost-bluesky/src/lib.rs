//! Bluesky (AT Protocol) client used as the social platform.
//!
//! Reads the account's newest post for duplicate detection and creates
//! `app.bsky.feed.post` records with an optional external link card or link
//! facet.

pub mod client;
pub mod error;
mod feed;
mod record;
mod retry;
pub mod types;

pub use client::BlueskyClient;
pub use error::BlueskyError;
