//! Match profiles: named weighting/threshold policies.

use serde::{Deserialize, Serialize};

use crate::domain::PipelineError;

/// Tolerance for the weight-sum invariant.
pub const WEIGHT_TOLERANCE: f64 = 1e-6;

const DEFAULT_TFIDF_WEIGHT: f64 = 0.55;
const DEFAULT_KEYWORD_WEIGHT: f64 = 0.35;
const DEFAULT_TITLE_WEIGHT: f64 = 0.10;

/// Named matching mode controlling the threshold multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    Strict,
    Standard,
    Lenient,
}

impl MatchMode {
    fn threshold_multiplier(self) -> f64 {
        match self {
            // Strict raises the comparison threshold externally; it never
            // shrinks the score itself.
            MatchMode::Strict => 1.25,
            MatchMode::Standard => 1.0,
            MatchMode::Lenient => 0.8,
        }
    }
}

/// Immutable weighting policy for the match scorer.
///
/// The three component weights must sum to 1.0 (within [`WEIGHT_TOLERANCE`]);
/// violations are rejected here at construction so they can never reach
/// scoring.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchProfile {
    mode: MatchMode,
    tfidf_weight: f64,
    keyword_weight: f64,
    title_weight: f64,
    threshold_multiplier: f64,
}

impl MatchProfile {
    pub fn new(
        mode: MatchMode,
        tfidf_weight: f64,
        keyword_weight: f64,
        title_weight: f64,
    ) -> Result<Self, PipelineError> {
        for (name, weight) in [
            ("tfidf_weight", tfidf_weight),
            ("keyword_weight", keyword_weight),
            ("title_weight", title_weight),
        ] {
            if weight < 0.0 || !weight.is_finite() {
                return Err(PipelineError::profile(format!(
                    "{name} must be a non-negative finite number, got {weight}"
                )));
            }
        }

        let sum = tfidf_weight + keyword_weight + title_weight;
        if (sum - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(PipelineError::profile(format!(
                "component weights must sum to 1.0, got {sum}"
            )));
        }

        Ok(Self {
            mode,
            tfidf_weight,
            keyword_weight,
            title_weight,
            threshold_multiplier: mode.threshold_multiplier(),
        })
    }

    /// Strict profile with the default component weights.
    pub fn strict() -> Self {
        Self::with_default_weights(MatchMode::Strict)
    }

    /// Standard profile with the default component weights.
    pub fn standard() -> Self {
        Self::with_default_weights(MatchMode::Standard)
    }

    /// Lenient profile with the default component weights.
    pub fn lenient() -> Self {
        Self::with_default_weights(MatchMode::Lenient)
    }

    fn with_default_weights(mode: MatchMode) -> Self {
        Self {
            mode,
            tfidf_weight: DEFAULT_TFIDF_WEIGHT,
            keyword_weight: DEFAULT_KEYWORD_WEIGHT,
            title_weight: DEFAULT_TITLE_WEIGHT,
            threshold_multiplier: mode.threshold_multiplier(),
        }
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    pub fn tfidf_weight(&self) -> f64 {
        self.tfidf_weight
    }

    pub fn keyword_weight(&self) -> f64 {
        self.keyword_weight
    }

    pub fn title_weight(&self) -> f64 {
        self.title_weight
    }

    pub fn threshold_multiplier(&self) -> f64 {
        self.threshold_multiplier
    }

    /// Applies the mode's multiplier to a raw weighted score.
    ///
    /// Lenient mode (multiplier < 1.0) boosts by dividing, always clamped to
    /// 1.0. Standard and strict leave the score untouched; strict instead
    /// raises the effective threshold, see [`Self::effective_threshold`].
    pub fn apply_multiplier(&self, raw: f64) -> f64 {
        let raw = raw.clamp(0.0, 1.0);
        if self.threshold_multiplier < 1.0 {
            (raw / self.threshold_multiplier).min(1.0)
        } else {
            raw
        }
    }

    /// The comparison threshold a caller-supplied minimum score becomes
    /// under this profile.
    pub fn effective_threshold(&self, min_score: f64) -> f64 {
        (min_score * self.threshold_multiplier).min(1.0)
    }
}

impl Default for MatchProfile {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_sum_to_one() {
        for profile in [
            MatchProfile::strict(),
            MatchProfile::standard(),
            MatchProfile::lenient(),
        ] {
            let sum = profile.tfidf_weight() + profile.keyword_weight() + profile.title_weight();
            assert!((sum - 1.0).abs() <= WEIGHT_TOLERANCE);
        }
    }

    #[test]
    fn test_weights_outside_tolerance_rejected() {
        let result = MatchProfile::new(MatchMode::Standard, 0.5, 0.3, 0.1);
        assert!(matches!(result, Err(PipelineError::Profile { .. })));
    }

    #[test]
    fn test_negative_weight_rejected() {
        let result = MatchProfile::new(MatchMode::Standard, 1.2, -0.3, 0.1);
        assert!(matches!(result, Err(PipelineError::Profile { .. })));
    }

    #[test]
    fn test_weights_within_tolerance_accepted() {
        let result = MatchProfile::new(MatchMode::Lenient, 0.55, 0.35, 0.1 + 5e-7);
        assert!(result.is_ok());
    }

    #[test]
    fn test_lenient_multiplier_boosts_score() {
        // raw 0.5 under multiplier 0.8 -> 0.625
        let profile = MatchProfile::lenient();
        assert!((profile.apply_multiplier(0.5) - 0.625).abs() < 1e-9);
    }

    #[test]
    fn test_lenient_boost_clamps_at_one() {
        let profile = MatchProfile::lenient();
        assert_eq!(profile.apply_multiplier(0.95), 1.0);
    }

    #[test]
    fn test_standard_and_strict_leave_score_unchanged() {
        assert_eq!(MatchProfile::standard().apply_multiplier(0.5), 0.5);
        assert_eq!(MatchProfile::strict().apply_multiplier(0.5), 0.5);
    }

    #[test]
    fn test_strict_raises_effective_threshold() {
        let profile = MatchProfile::strict();
        assert!(profile.effective_threshold(0.6) > 0.6);
        assert_eq!(MatchProfile::standard().effective_threshold(0.6), 0.6);
    }
}
