//! Input documents for matching and optimization.

use std::collections::BTreeSet;

use crate::domain::keywords::KeywordExtractor;
use crate::domain::matching::normalize;

/// A candidate resume. Immutable once constructed; normalization and keyword
/// extraction happen exactly once here.
#[derive(Debug, Clone)]
pub struct ResumeDocument {
    raw_text: String,
    normalized_text: String,
    keywords: BTreeSet<String>,
}

impl ResumeDocument {
    pub fn new(raw_text: impl Into<String>, extractor: &dyn KeywordExtractor) -> Self {
        let raw_text = raw_text.into();
        let normalized_text = normalize(&raw_text);
        let keywords = extractor.extract_keywords(&raw_text);

        Self {
            raw_text,
            normalized_text,
            keywords,
        }
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    pub fn normalized_text(&self) -> &str {
        &self.normalized_text
    }

    pub fn keywords(&self) -> &BTreeSet<String> {
        &self.keywords
    }
}

/// A job posting. Company and location may be unknown; the description is
/// the scoring signal and an empty one simply scores zero on the text
/// components rather than erroring.
#[derive(Debug, Clone)]
pub struct JobPosting {
    title: String,
    company: Option<String>,
    location: Option<String>,
    description: String,
    normalized_description: String,
    keywords: BTreeSet<String>,
    title_keywords: BTreeSet<String>,
}

impl JobPosting {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        extractor: &dyn KeywordExtractor,
    ) -> Self {
        let title = title.into();
        let description = description.into();
        let normalized_description = normalize(&description);
        let keywords = extractor.extract_keywords(&description);
        let title_keywords = extractor.extract_keywords(&title);

        Self {
            title,
            company: None,
            location: None,
            description,
            normalized_description,
            keywords,
            title_keywords,
        }
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn company(&self) -> Option<&str> {
        self.company.as_deref()
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn normalized_description(&self) -> &str {
        &self.normalized_description
    }

    pub fn keywords(&self) -> &BTreeSet<String> {
        &self.keywords
    }

    /// Title tokens produced by the keyword extractor, used for the title
    /// component of the match score.
    pub fn title_keywords(&self) -> &BTreeSet<String> {
        &self.title_keywords
    }
}
