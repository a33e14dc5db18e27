//! is.gd link shortener.

pub mod client;
pub mod error;

pub use client::IsGdShortener;
pub use error::ShortenerError;
