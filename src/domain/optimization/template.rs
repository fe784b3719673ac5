//! Versioned prompt templates.
//!
//! Variable syntax: `${var:name}`. Every variable is required; rendering
//! with one missing is a template error. The version string participates in
//! request fingerprinting, so editing a template under a new version never
//! collides with cached results of the old one.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::PipelineError;

static VARIABLE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{var:([a-zA-Z0-9][a-zA-Z0-9_\-]*)\}").unwrap());

/// Variable carrying the candidate's resume text.
pub const VAR_RESUME_TEXT: &str = "resume_text";
/// Variable carrying the job description (plus any injected analysis).
pub const VAR_JOB_DESCRIPTION: &str = "job_description";

const DEFAULT_TEMPLATE_VERSION: &str = "v1";

const DEFAULT_OPTIMIZATION_TEMPLATE: &str = r#"As an expert resume optimizer, analyze the resume and job description below.
Provide specific, actionable suggestions to improve the resume to better match the job requirements.
Format your response as a JSON object with the following structure:

{
  "summary": "A brief summary of how well the resume matches the job description",
  "skills_to_add": ["List of skills missing from resume that should be added"],
  "skills_to_remove": ["List of skills in resume that are irrelevant to this job"],
  "experience_tweaks": [
    {
      "original": "Original resume bullet or section",
      "optimized": "Improved version that better aligns with job description"
    }
  ],
  "formatting_suggestions": ["Specific formatting changes to improve ATS compatibility"],
  "collaboration_points": ["Areas where collaboration would strengthen the resume for this role"]
}

RESUME:
${var:resume_text}

JOB DESCRIPTION:
${var:job_description}

Remember to maintain the exact JSON structure shown above and ensure all required keys are present."#;

/// A parsed, versioned prompt template.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    version: String,
    content: String,
    variables: Vec<String>,
}

impl PromptTemplate {
    /// Parses a template, extracting its variables. The resume and job
    /// placeholders must both be present; a template without them cannot
    /// drive an optimization.
    pub fn parse(
        version: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<Self, PipelineError> {
        let version = version.into();
        let content = content.into();

        let mut variables = Vec::new();
        for cap in VARIABLE_PATTERN.captures_iter(&content) {
            let name = cap[1].to_string();
            if !variables.contains(&name) {
                variables.push(name);
            }
        }

        for required in [VAR_RESUME_TEXT, VAR_JOB_DESCRIPTION] {
            if !variables.iter().any(|v| v == required) {
                return Err(PipelineError::template(format!(
                    "template '{version}' is missing the ${{var:{required}}} placeholder"
                )));
            }
        }

        Ok(Self {
            version,
            content,
            variables,
        })
    }

    /// The built-in optimization prompt asking for the JSON improvement plan.
    pub fn default_optimization() -> Self {
        Self {
            version: DEFAULT_TEMPLATE_VERSION.to_string(),
            content: DEFAULT_OPTIMIZATION_TEMPLATE.to_string(),
            variables: vec![VAR_RESUME_TEXT.to_string(), VAR_JOB_DESCRIPTION.to_string()],
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// Renders the template, substituting every `${var:name}` occurrence.
    pub fn render(&self, values: &HashMap<String, String>) -> Result<String, PipelineError> {
        let mut missing: Option<String> = None;

        let rendered = VARIABLE_PATTERN.replace_all(&self.content, |caps: &regex::Captures| {
            let name = &caps[1];
            match values.get(name) {
                Some(value) => value.clone(),
                None => {
                    missing.get_or_insert_with(|| name.to_string());
                    String::new()
                }
            }
        });

        if let Some(name) = missing {
            return Err(PipelineError::template(format!(
                "missing required variable: {name}"
            )));
        }

        Ok(rendered.into_owned())
    }
}
