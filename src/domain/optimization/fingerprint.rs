//! Fingerprinting of optimization requests.

use sha2::{Digest, Sha256};

/// Deterministic content hash identifying one optimization request:
/// (normalized resume text, normalized job text, prompt template version).
///
/// Pure content hash with no salt or timestamp, so it is stable across
/// process restarts. Fields are length-prefixed before hashing so adjacent
/// fields can never alias. Collisions beyond hash-function accident are a
/// documented, accepted risk.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OptimizationFingerprint(String);

impl OptimizationFingerprint {
    pub fn compute(resume_norm: &str, job_norm: &str, template_version: &str) -> Self {
        let mut hasher = Sha256::new();

        for part in [resume_norm, job_norm, template_version] {
            hasher.update((part.len() as u64).to_be_bytes());
            hasher.update(part.as_bytes());
        }

        Self(hex::encode(hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OptimizationFingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
