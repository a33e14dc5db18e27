//! Builds the exact payload handed to the publisher.

use feedpost_core::{AssembledPost, LinkFacet, LinkPreview, PostMode, Url};

use crate::caption::SanitizedCaption;
use crate::dedup::HEADLINE_SEPARATOR;
use crate::error::AssembleError;

/// Placed between caption and link in [`PostMode::TextWithInlineLink`].
pub const LINK_SEPARATOR: &str = " ";

#[derive(Debug, Clone, Copy)]
pub struct PostAssembler {
    platform_limit: usize,
}

impl PostAssembler {
    #[must_use]
    pub fn new(platform_limit: usize) -> Self {
        Self { platform_limit }
    }

    #[must_use]
    pub fn platform_limit(&self) -> usize {
        self.platform_limit
    }

    /// Compose the post for `mode`, opening with `headline` on its own line
    /// when one is given.
    ///
    /// The link is never truncated: a post whose text would exceed the platform
    /// limit is rejected instead of shortened.
    ///
    /// # Errors
    ///
    /// Returns [`AssembleError::LengthExceeded`] when the rendered text is longer
    /// than the platform limit.
    pub fn assemble(
        &self,
        caption: &SanitizedCaption,
        headline: Option<&str>,
        link: &Url,
        title: &str,
        mode: PostMode,
    ) -> Result<AssembledPost, AssembleError> {
        let mut body = String::new();
        if let Some(headline) = headline {
            body.push_str(headline);
            if !caption.as_str().is_empty() {
                body.push_str(HEADLINE_SEPARATOR);
            }
        }
        body.push_str(caption.as_str());

        let post = match mode {
            PostMode::TextOnly => AssembledPost {
                text: body,
                embed: None,
                link_facet: None,
            },
            PostMode::TextWithEmbed => AssembledPost {
                text: body,
                embed: Some(LinkPreview {
                    uri: link.clone(),
                    title: title.trim().to_string(),
                    description: String::new(),
                }),
                link_facet: None,
            },
            PostMode::TextWithInlineLink => {
                let mut text = body;
                if !text.is_empty() {
                    text.push_str(LINK_SEPARATOR);
                }
                let byte_start = text.len();
                text.push_str(link.as_str());
                AssembledPost {
                    link_facet: Some(LinkFacet {
                        byte_start,
                        byte_end: text.len(),
                        uri: link.clone(),
                    }),
                    text,
                    embed: None,
                }
            }
        };

        let length = post.char_len();
        if length > self.platform_limit {
            return Err(AssembleError::LengthExceeded {
                length,
                limit: self.platform_limit,
            });
        }
        Ok(post)
    }
}
