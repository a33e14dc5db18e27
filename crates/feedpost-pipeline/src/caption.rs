//! Hard length bound for generated captions.
//!
//! The prompt asks the generator to stay under the limit; nothing guarantees
//! it does, so every caption passes through [`enforce`] before assembly.

use crate::sanitize::ContentSanitizer;

/// Marker appended when a caption is cut.
pub const ELLIPSIS: &str = "...";

/// Untrusted text straight from the generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCaption {
    pub text: String,
}

/// Caption after sanitization and length enforcement; the only caption shape
/// the assembler accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedCaption {
    text: String,
}

impl SanitizedCaption {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Bound `text` to at most `max_chars` characters.
///
/// Text within the bound is returned unchanged. Longer text is cut to
/// `max_chars - 3` characters, trailing whitespace is dropped, and [`ELLIPSIS`]
/// is appended. When `max_chars` cannot fit the marker at all, the text is
/// hard-cut with no marker.
#[must_use]
pub fn enforce(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let marker_len = ELLIPSIS.chars().count();
    if max_chars <= marker_len {
        return text.chars().take(max_chars).collect();
    }

    let kept: String = text.chars().take(max_chars - marker_len).collect();
    format!("{}{ELLIPSIS}", kept.trim_end())
}

/// Sanitize, then enforce the length bound. The bound checked here is the
/// final caption length.
#[must_use]
pub fn constrain(
    raw: &RawCaption,
    sanitizer: &ContentSanitizer,
    max_chars: usize,
) -> SanitizedCaption {
    let cleaned = sanitizer.sanitize(&raw.text);
    SanitizedCaption {
        text: enforce(&cleaned, max_chars),
    }
}
