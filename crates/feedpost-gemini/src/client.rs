//! HTTP client for the Gemini `generateContent` endpoint.
//!
//! The API key travels in the `x-goog-api-key` header so it never appears in
//! URLs that might be logged.

use std::time::Duration;

use feedpost_core::{CaptionGenerator, Url};
use reqwest::Client;

use crate::error::GeminiError;
use crate::retry::retry_with_backoff;
use crate::types::{
    Content, ErrorEnvelope, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    Part,
};

const BACKOFF_BASE_MS: u64 = 1_000;

pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: Url,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl GeminiClient {
    /// Creates a client for `model` served under `base_url`
    /// (`https://generativelanguage.googleapis.com` in production).
    ///
    /// # Errors
    ///
    /// Returns [`GeminiError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        api_key: &str,
        model: &str,
        base_url: Url,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, GeminiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            model: model.to_owned(),
            base_url,
            max_retries: 0,
            backoff_base_ms: BACKOFF_BASE_MS,
        })
    }

    /// Sets how many extra attempts transient failures get.
    #[must_use]
    pub fn with_retries(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.backoff_base_ms = backoff_base_ms;
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.as_str().trim_end_matches('/'),
            self.model
        )
    }

    /// Sends `prompt` as a single user turn and returns the first candidate's
    /// text.
    ///
    /// # Errors
    ///
    /// - [`GeminiError::Api`] on a non-2xx answer (quota, auth, bad request).
    /// - [`GeminiError::Blocked`] when the prompt was refused.
    /// - [`GeminiError::EmptyResponse`] when no candidate carries text.
    /// - [`GeminiError::Http`] on network failure.
    /// - [`GeminiError::Deserialize`] if the body does not match the expected shape.
    pub async fn generate_text(&self, prompt: &str) -> Result<String, GeminiError> {
        let response = retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            self.request_once(prompt)
        })
        .await?;

        if let Some(text) = response.first_text() {
            return Ok(text);
        }
        if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(GeminiError::Blocked(reason));
        }
        let finish = response
            .candidates
            .first()
            .and_then(|c| c.finish_reason.as_deref())
            .unwrap_or("none");
        tracing::warn!(model = %self.model, finish_reason = finish, "Gemini returned no text");
        Err(GeminiError::EmptyResponse)
    }

    async fn request_once(&self, prompt: &str) -> Result<GenerateContentResponse, GeminiError> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
            generation_config: Some(GenerationConfig {
                temperature: 0.7,
                max_output_tokens: 512,
            }),
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            let message = serde_json::from_str::<ErrorEnvelope>(&text).map_or_else(
                |_| text.chars().take(200).collect(),
                |env| match env.error.status {
                    Some(s) => format!("{s}: {}", env.error.message),
                    None => env.error.message,
                },
            );
            return Err(GeminiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&text).map_err(|e| GeminiError::Deserialize {
            context: format!("generateContent(model={})", self.model),
            source: e,
        })
    }
}

impl CaptionGenerator for GeminiClient {
    type Error = GeminiError;

    async fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        self.generate_text(prompt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_includes_model_and_strips_trailing_slash() {
        let client = GeminiClient::new(
            "k",
            "gemini-1.5-flash",
            Url::parse("http://127.0.0.1:9999/").unwrap(),
            5,
            "feedpost-test",
        )
        .unwrap();
        assert_eq!(
            client.endpoint(),
            "http://127.0.0.1:9999/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }
}
