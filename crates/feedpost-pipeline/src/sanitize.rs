//! Removal of tokens the platform must never receive from us, such as
//! account mentions invented by the generator.

use regex::Regex;

/// Token patterns removed when no configuration says otherwise.
pub const DEFAULT_FORBIDDEN_PATTERNS: &[&str] = &["^@"];

/// Drops whitespace-separated tokens that match any forbidden pattern.
#[derive(Debug, Clone)]
pub struct ContentSanitizer {
    patterns: Vec<Regex>,
}

impl ContentSanitizer {
    /// Compiles `patterns`; each is matched against one whole token at a time.
    ///
    /// # Errors
    ///
    /// Returns [`regex::Error`] if any pattern fails to compile.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, regex::Error> {
        let patterns = patterns
            .iter()
            .map(|p| Regex::new(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// Sanitizer with [`DEFAULT_FORBIDDEN_PATTERNS`].
    #[must_use]
    pub fn with_defaults() -> Self {
        let patterns = DEFAULT_FORBIDDEN_PATTERNS
            .iter()
            .filter_map(|p| Regex::new(p).ok())
            .collect();
        Self { patterns }
    }

    #[must_use]
    pub fn is_forbidden(&self, token: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(token))
    }

    /// Split on whitespace, drop forbidden tokens, rejoin with single spaces.
    ///
    /// The result is never longer than the whitespace-normalized input.
    #[must_use]
    pub fn sanitize(&self, text: &str) -> String {
        text.split_whitespace()
            .filter(|token| !self.is_forbidden(token))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
