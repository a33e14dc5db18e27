//! RSS feed source for feedpost.
//!
//! Fetches an RSS 2.0 feed and hands the pipeline its newest `<item>`.

pub mod client;
pub mod error;
mod parse;

pub use client::RssFeedClient;
pub use error::FeedError;
pub use parse::parse_latest_item;
