//! Google Gemini client used as the caption generator.

pub mod client;
pub mod error;
mod retry;
pub mod types;

pub use client::GeminiClient;
pub use error::GeminiError;
