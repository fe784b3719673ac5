//! TF-IDF cosine similarity over a two-document corpus.

use std::collections::{BTreeSet, HashMap};

/// Cosine similarity between the TF-IDF vectors of two normalized texts.
///
/// The corpus is exactly `{doc_a, doc_b}`; idf uses the smoothed form
/// `ln((1 + n) / (1 + df)) + 1` so terms present in both documents still
/// carry weight. The result is clamped to [0, 1]. Either input being empty
/// yields 0.
pub fn cosine_similarity(doc_a: &str, doc_b: &str) -> f64 {
    if doc_a.is_empty() || doc_b.is_empty() {
        return 0.0;
    }

    let tf_a = term_frequencies(doc_a);
    let tf_b = term_frequencies(doc_b);

    let vocabulary: BTreeSet<&str> = tf_a.keys().chain(tf_b.keys()).copied().collect();

    let mut dot = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;

    for term in vocabulary {
        let in_a = tf_a.contains_key(term);
        let in_b = tf_b.contains_key(term);
        let df = usize::from(in_a) + usize::from(in_b);

        let idf = ((1.0 + 2.0) / (1.0 + df as f64)).ln() + 1.0;
        let weight_a = tf_a.get(term).copied().unwrap_or(0.0) * idf;
        let weight_b = tf_b.get(term).copied().unwrap_or(0.0) * idf;

        dot += weight_a * weight_b;
        norm_a += weight_a * weight_a;
        norm_b += weight_b * weight_b;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(0.0, 1.0)
}

/// Relative term frequencies of a whitespace-tokenized document.
fn term_frequencies(doc: &str) -> HashMap<&str, f64> {
    let mut counts: HashMap<&str, f64> = HashMap::new();
    let mut total = 0.0;

    for term in doc.split_whitespace() {
        *counts.entry(term).or_insert(0.0) += 1.0;
        total += 1.0;
    }

    if total > 0.0 {
        for value in counts.values_mut() {
            *value /= total;
        }
    }

    counts
}
