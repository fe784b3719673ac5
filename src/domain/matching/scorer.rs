//! Multi-signal match scoring.
//!
//! Combines TF-IDF text similarity, keyword overlap, and title relevance
//! into one bounded score under a [`MatchProfile`]. Pure: no I/O, no
//! mutation, identical inputs give a bit-identical [`MatchResult`].

use std::collections::BTreeSet;

use serde::Serialize;

use super::profile::MatchProfile;
use super::tfidf;
use crate::domain::document::{JobPosting, ResumeDocument};

/// Outcome of scoring one (resume, job) pair. Derived data only; never
/// mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    /// Final combined score in [0, 1].
    pub score: f64,
    pub tfidf_score: f64,
    pub keyword_score: f64,
    pub title_score: f64,
    /// Job keywords also present in the resume.
    pub matched_keywords: BTreeSet<String>,
    /// Job keywords absent from the resume, for gap analysis.
    pub missing_keywords: BTreeSet<String>,
}

impl MatchResult {
    /// Match score as a percentage string, e.g. `"62.5%"`.
    pub fn score_percentage(&self) -> String {
        format!("{:.1}%", self.score * 100.0)
    }
}

/// Scores how well a resume matches a job posting.
///
/// Component scores are each clamped to [0, 1]; the weighted sum is then
/// adjusted by the profile's threshold multiplier (a lenient floor boost,
/// clamped to 1.0). An empty job description contributes zero through the
/// text components; the result is whatever the remaining signals carry.
pub fn score(resume: &ResumeDocument, job: &JobPosting, profile: &MatchProfile) -> MatchResult {
    let tfidf_score =
        tfidf::cosine_similarity(resume.normalized_text(), job.normalized_description());

    let matched_keywords: BTreeSet<String> = job
        .keywords()
        .intersection(resume.keywords())
        .cloned()
        .collect();
    let missing_keywords: BTreeSet<String> = job
        .keywords()
        .difference(resume.keywords())
        .cloned()
        .collect();
    let keyword_score = overlap_ratio(matched_keywords.len(), job.keywords().len());

    let title_hits = job
        .title_keywords()
        .intersection(resume.keywords())
        .count();
    let title_score = overlap_ratio(title_hits, job.title_keywords().len());

    let raw = profile.tfidf_weight() * tfidf_score
        + profile.keyword_weight() * keyword_score
        + profile.title_weight() * title_score;

    MatchResult {
        score: profile.apply_multiplier(raw),
        tfidf_score,
        keyword_score,
        title_score,
        matched_keywords,
        missing_keywords,
    }
}

/// `hits / max(1, total)`, clamped. The max(1, ·) floor makes an empty
/// keyword set score 0 instead of dividing by zero.
fn overlap_ratio(hits: usize, total: usize) -> f64 {
    (hits as f64 / total.max(1) as f64).clamp(0.0, 1.0)
}
