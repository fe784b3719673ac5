//! Match scoring: text normalization, TF-IDF similarity, and the
//! multi-signal scorer with its weighting profiles.

pub mod normalize;
pub mod profile;
pub mod scorer;
pub mod tfidf;

pub use normalize::normalize;
pub use profile::{MatchMode, MatchProfile, WEIGHT_TOLERANCE};
pub use scorer::{score, MatchResult};
