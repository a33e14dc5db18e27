//! Instructions sent to the caption generator.
//!
//! The length and content rules in the prompt are the primary control; the
//! enforcer and sanitizer only catch what the generator ignores.

use feedpost_core::FeedItem;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub source_title: String,
    pub source_link: String,
    pub max_chars: usize,
    pub forbidden_patterns: Vec<String>,
    pub hashtags: Vec<String>,
}

impl GenerationRequest {
    #[must_use]
    pub fn new(
        item: &FeedItem,
        max_chars: usize,
        forbidden_patterns: &[String],
        hashtags: &[String],
    ) -> Self {
        Self {
            source_title: item.title.trim().to_string(),
            source_link: item.canonical_link.to_string(),
            max_chars,
            forbidden_patterns: forbidden_patterns.to_vec(),
            hashtags: hashtags.to_vec(),
        }
    }

    /// Render the request as a single prompt string.
    #[must_use]
    pub fn render_prompt(&self) -> String {
        let mut rules = vec![
            format!(
                "- The post must be at most {} characters long.",
                self.max_chars
            ),
            "- Be informative and slightly enthusiastic.".to_string(),
            "- Do not include any link or URL; the link is attached separately.".to_string(),
            "- Never mention or tag any account or user.".to_string(),
        ];
        if !self.forbidden_patterns.is_empty() {
            rules.push(format!(
                "- No word may match any of these patterns: {}.",
                self.forbidden_patterns.join(", ")
            ));
        }
        if !self.hashtags.is_empty() {
            rules.push(format!(
                "- Include 1-2 relevant hashtags such as {}.",
                self.hashtags.join(", ")
            ));
        }

        format!(
            "You are a news bot for a short-form social network.\n\
             Write one short, engaging post about the article below.\n\n\
             RULES:\n{}\n\n\
             Article title: \"{}\"\n\
             Article link (for context only): {}\n\n\
             Reply with the post text only.",
            rules.join("\n"),
            self.source_title,
            self.source_link,
        )
    }
}
