//! Schema-validated optimization results.

use serde::{Deserialize, Serialize};

use crate::domain::PipelineError;

/// One suggested rewrite of a resume bullet or section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceTweak {
    pub original: String,
    pub optimized: String,
}

/// The improvement plan produced by the model.
///
/// Every field is required; a response missing any of them (or carrying the
/// wrong types) is rejected by [`parse_and_validate`] and never cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub summary: String,
    pub skills_to_add: Vec<String>,
    pub skills_to_remove: Vec<String>,
    pub experience_tweaks: Vec<ExperienceTweak>,
    pub formatting_suggestions: Vec<String>,
    pub collaboration_points: Vec<String>,
}

/// Parses a raw model response into an [`OptimizationResult`].
///
/// Models often wrap the JSON object in prose; if the full response fails to
/// parse, the outermost `{...}` slice is tried before giving up. Any schema
/// mismatch surfaces as a `Validation` error.
pub fn parse_and_validate(raw: &str) -> Result<OptimizationResult, PipelineError> {
    let value: serde_json::Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(_) => {
            let start = raw.find('{');
            let end = raw.rfind('}');
            let slice = match (start, end) {
                (Some(start), Some(end)) if end > start => &raw[start..=end],
                _ => {
                    return Err(PipelineError::validation(
                        "no JSON object found in model response",
                    ));
                }
            };
            serde_json::from_str(slice).map_err(|e| {
                PipelineError::validation(format!("failed to parse JSON from model response: {e}"))
            })?
        }
    };

    let result: OptimizationResult = serde_json::from_value(value).map_err(|e| {
        PipelineError::validation(format!("response does not match optimization schema: {e}"))
    })?;

    if result.summary.trim().is_empty() {
        return Err(PipelineError::validation("summary must be non-empty"));
    }

    Ok(result)
}
