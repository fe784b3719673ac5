//! Keyword extraction seam
//!
//! The pipeline treats skill extraction as an opaque collaborator: anything
//! that turns text into a set of normalized tokens. A regex-based default is
//! shipped so the crate works out of the box.

use std::collections::BTreeSet;
use std::fmt::Debug;

use once_cell::sync::Lazy;
use regex::Regex;

/// Matches word-like tokens including technical spellings (c++, c#, node.js).
static WORD_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-zA-Z][\w+#.\-]*").unwrap());

/// Collaborator interface for skill/technology token extraction.
///
/// Implementations must be deterministic: identical text yields an identical
/// set, which in turn keeps `MatchResult` bit-identical across calls.
pub trait KeywordExtractor: Send + Sync + Debug {
    fn extract_keywords(&self, text: &str) -> BTreeSet<String>;
}

/// Default extractor: lowercased word tokens of a minimum length.
#[derive(Debug, Clone)]
pub struct RegexKeywordExtractor {
    min_length: usize,
}

impl RegexKeywordExtractor {
    pub fn new() -> Self {
        Self { min_length: 4 }
    }

    /// Overrides the minimum token length (default 4).
    pub fn with_min_length(mut self, min_length: usize) -> Self {
        self.min_length = min_length;
        self
    }
}

impl Default for RegexKeywordExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl KeywordExtractor for RegexKeywordExtractor {
    fn extract_keywords(&self, text: &str) -> BTreeSet<String> {
        WORD_PATTERN
            .find_iter(text)
            .map(|m| m.as_str().to_lowercase())
            .filter(|token| token.chars().count() >= self.min_length)
            .collect()
    }
}
