//! Text normalization shared by the scorer and fingerprinting.

/// Normalizes free text for comparison: lowercases, collapses whitespace
/// runs to single spaces, and strips characters outside the alphanumeric +
/// basic punctuation set (`+ # . -`).
///
/// Pure and deterministic. Empty or whitespace-only input normalizes to the
/// empty string; callers treat that as "no signal", never an error.
pub fn normalize(text: &str) -> String {
    let mut cleaned = String::with_capacity(text.len());

    for c in text.chars() {
        let c = c.to_ascii_lowercase();
        if c.is_ascii_alphanumeric() || matches!(c, '+' | '#' | '.' | '-') {
            cleaned.push(c);
        } else {
            cleaned.push(' ');
        }
    }

    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}
