//! Optimization orchestrator.
//!
//! Ties the pipeline together: validates inputs, scores the match, builds
//! the prompt, and runs the LLM through the result cache so identical
//! requests share one generation.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::domain::keywords::{KeywordExtractor, RegexKeywordExtractor};
use crate::domain::llm::GenerationRequest;
use crate::domain::matching::{self, MatchProfile, MatchResult};
use crate::domain::optimization::result::parse_and_validate;
use crate::domain::optimization::{
    OptimizationFingerprint, OptimizationResult, PromptTemplate, VAR_JOB_DESCRIPTION,
    VAR_RESUME_TEXT,
};
use crate::domain::{JobPosting, PipelineError, ResumeDocument};
use crate::infrastructure::cache::ResultCache;
use crate::infrastructure::llm::ResilientLlmClient;

/// Shortest resume accepted, in characters after trimming.
pub const MIN_RESUME_CHARS: usize = 50;
/// Shortest job description accepted, in characters after trimming.
pub const MIN_JOB_CHARS: usize = 20;

/// How many missing and matched keywords the prompt surfaces.
const PROMPT_KEYWORD_LIMIT: usize = 10;

/// Everything the pipeline produces for one request.
#[derive(Debug, Clone, Serialize)]
pub struct OptimizationOutcome {
    pub match_result: MatchResult,
    pub optimization: OptimizationResult,
    pub fingerprint: String,
}

#[derive(Clone)]
pub struct Optimizer {
    client: ResilientLlmClient,
    cache: ResultCache,
    template: PromptTemplate,
    profile: MatchProfile,
    extractor: Arc<dyn KeywordExtractor>,
    temperature: f64,
    max_output_tokens: u32,
}

impl Optimizer {
    pub fn new(client: ResilientLlmClient, cache: ResultCache) -> Self {
        Self {
            client,
            cache,
            template: PromptTemplate::default_optimization(),
            profile: MatchProfile::standard(),
            extractor: Arc::new(RegexKeywordExtractor::default()),
            temperature: 0.2,
            max_output_tokens: 2048,
        }
    }

    pub fn with_template(mut self, template: PromptTemplate) -> Self {
        self.template = template;
        self
    }

    pub fn with_profile(mut self, profile: MatchProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn with_extractor(mut self, extractor: Arc<dyn KeywordExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }

    /// Runs the full pipeline for one resume against one job posting.
    pub async fn optimize(
        &self,
        resume_text: &str,
        job_title: &str,
        job_description: &str,
    ) -> Result<OptimizationOutcome, PipelineError> {
        validate_inputs(resume_text, job_description)?;

        let resume = ResumeDocument::new(resume_text, self.extractor.as_ref());
        let job = JobPosting::new(job_title, job_description, self.extractor.as_ref());

        let match_result = matching::score(&resume, &job, &self.profile);
        debug!(
            score = match_result.score,
            missing = match_result.missing_keywords.len(),
            "scored resume against job"
        );

        let fingerprint = OptimizationFingerprint::compute(
            resume.normalized_text(),
            job.normalized_description(),
            self.template.version(),
        );

        let prompt = self.build_prompt(&resume, &job, &match_result)?;
        let request = GenerationRequest::new(prompt)
            .with_temperature(self.temperature)
            .with_max_output_tokens(self.max_output_tokens);

        let client = self.client.clone();
        let optimization = self
            .cache
            .get_or_compute(&fingerprint, move || async move {
                let response = client.generate(&request).await?;
                parse_and_validate(&response.text)
            })
            .await?;

        info!(
            fingerprint = fingerprint.as_str(),
            model = self.client.model_name(),
            "optimization complete"
        );

        Ok(OptimizationOutcome {
            match_result,
            optimization,
            fingerprint: fingerprint.as_str().to_string(),
        })
    }

    /// Like [`optimize`](Self::optimize), but abandons the wait at
    /// `deadline`. The underlying compute keeps running on its own task
    /// and still lands in the cache once it finishes.
    pub async fn optimize_with_deadline(
        &self,
        resume_text: &str,
        job_title: &str,
        job_description: &str,
        deadline: tokio::time::Instant,
    ) -> Result<OptimizationOutcome, PipelineError> {
        tokio::time::timeout_at(deadline, self.optimize(resume_text, job_title, job_description))
            .await
            .map_err(|_| PipelineError::transient("deadline exceeded before optimization finished"))?
    }

    /// Renders the prompt, appending a short match analysis so the model
    /// sees which keywords the scorer found missing.
    fn build_prompt(
        &self,
        resume: &ResumeDocument,
        job: &JobPosting,
        match_result: &MatchResult,
    ) -> Result<String, PipelineError> {
        let mut enriched = job.description().to_string();
        enriched.push_str("\n\nMATCH ANALYSIS:\n");
        enriched.push_str(&format!(
            "Current match score: {}\n",
            match_result.score_percentage()
        ));

        if !match_result.missing_keywords.is_empty() {
            let missing: Vec<&str> = match_result
                .missing_keywords
                .iter()
                .take(PROMPT_KEYWORD_LIMIT)
                .map(String::as_str)
                .collect();
            enriched.push_str(&format!("Missing keywords: {}\n", missing.join(", ")));
        }

        if !match_result.matched_keywords.is_empty() {
            let matched: Vec<&str> = match_result
                .matched_keywords
                .iter()
                .take(PROMPT_KEYWORD_LIMIT)
                .map(String::as_str)
                .collect();
            enriched.push_str(&format!("Matched keywords: {}\n", matched.join(", ")));
        }

        let vars = HashMap::from([
            (VAR_RESUME_TEXT.to_string(), resume.raw_text().to_string()),
            (VAR_JOB_DESCRIPTION.to_string(), enriched),
        ]);

        self.template.render(&vars)
    }
}

impl std::fmt::Debug for Optimizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Optimizer")
            .field("model", &self.client.model_name())
            .field("template_version", &self.template.version())
            .finish_non_exhaustive()
    }
}

fn validate_inputs(resume_text: &str, job_description: &str) -> Result<(), PipelineError> {
    if resume_text.trim().chars().count() < MIN_RESUME_CHARS {
        return Err(PipelineError::validation(format!(
            "resume text must be at least {} characters",
            MIN_RESUME_CHARS
        )));
    }

    if job_description.trim().chars().count() < MIN_JOB_CHARS {
        return Err(PipelineError::validation(format!(
            "job description must be at least {} characters",
            MIN_JOB_CHARS
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::domain::llm::GenerationResponse;
    use crate::domain::llm::provider::mock::MockLlmProvider;
    use crate::infrastructure::cache::InMemoryCache;
    use crate::infrastructure::llm::RetryConfig;

    const RESUME: &str = "Seasoned backend engineer with years of python, aws and docker \
                          experience building data pipelines and web services.";
    const JOB_TITLE: &str = "Senior Backend Engineer";
    const JOB_DESCRIPTION: &str = "We need a backend engineer strong in python, kubernetes \
                                   and terraform to run our cloud platform.";

    fn valid_response() -> String {
        serde_json::json!({
            "summary": "Good technical overlap, missing platform tooling",
            "skills_to_add": ["kubernetes", "terraform"],
            "skills_to_remove": [],
            "experience_tweaks": [],
            "formatting_suggestions": [],
            "collaboration_points": []
        })
        .to_string()
    }

    fn optimizer_with(provider: Arc<MockLlmProvider>) -> Optimizer {
        let client = ResilientLlmClient::new(
            provider,
            RetryConfig::new(0).with_backoff_factor(0.0),
        );
        let cache = ResultCache::new(Arc::new(InMemoryCache::new()), Duration::from_secs(60));
        Optimizer::new(client, cache)
    }

    #[tokio::test]
    async fn test_optimize_end_to_end() {
        let provider = Arc::new(MockLlmProvider::new(vec![Ok(GenerationResponse::new(
            valid_response(),
            "mock-model",
        ))]));
        let optimizer = optimizer_with(provider.clone());

        let outcome = optimizer
            .optimize(RESUME, JOB_TITLE, JOB_DESCRIPTION)
            .await
            .unwrap();

        assert!(outcome.match_result.score > 0.0);
        assert_eq!(
            outcome.optimization.skills_to_add,
            vec!["kubernetes", "terraform"]
        );
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_repeat_request_served_from_cache() {
        let provider = Arc::new(MockLlmProvider::new(vec![Ok(GenerationResponse::new(
            valid_response(),
            "mock-model",
        ))]));
        let optimizer = optimizer_with(provider.clone());

        let first = optimizer
            .optimize(RESUME, JOB_TITLE, JOB_DESCRIPTION)
            .await
            .unwrap();
        let second = optimizer
            .optimize(RESUME, JOB_TITLE, JOB_DESCRIPTION)
            .await
            .unwrap();

        assert_eq!(first.fingerprint, second.fingerprint);
        assert_eq!(first.optimization, second.optimization);
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_identical_requests_generate_once() {
        let provider = Arc::new(
            MockLlmProvider::new(vec![Ok(GenerationResponse::new(
                valid_response(),
                "mock-model",
            ))])
            .with_delay(Duration::from_millis(50)),
        );
        let optimizer = optimizer_with(provider.clone());

        let mut handles = Vec::new();
        for _ in 0..5 {
            let optimizer = optimizer.clone();
            handles.push(tokio::spawn(async move {
                optimizer.optimize(RESUME, JOB_TITLE, JOB_DESCRIPTION).await
            }));
        }

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_malformed_response_fails_and_recomputes_next_time() {
        let provider = Arc::new(MockLlmProvider::new(vec![
            Ok(GenerationResponse::new("not json at all", "mock-model")),
            Ok(GenerationResponse::new(valid_response(), "mock-model")),
        ]));
        let optimizer = optimizer_with(provider.clone());

        let err = optimizer
            .optimize(RESUME, JOB_TITLE, JOB_DESCRIPTION)
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Validation { .. }));

        // The failure was not cached; the retry reaches the provider again.
        let outcome = optimizer
            .optimize(RESUME, JOB_TITLE, JOB_DESCRIPTION)
            .await
            .unwrap();
        assert_eq!(outcome.optimization.summary.is_empty(), false);
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn test_rejects_short_resume() {
        let optimizer = optimizer_with(Arc::new(MockLlmProvider::succeeding_with("x")));

        let err = optimizer
            .optimize("too short", JOB_TITLE, JOB_DESCRIPTION)
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_rejects_short_job_description() {
        let optimizer = optimizer_with(Arc::new(MockLlmProvider::succeeding_with("x")));

        let err = optimizer
            .optimize(RESUME, JOB_TITLE, "tiny")
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_prompt_carries_match_analysis() {
        let provider = Arc::new(MockLlmProvider::new(vec![Ok(GenerationResponse::new(
            valid_response(),
            "mock-model",
        ))]));
        let optimizer = optimizer_with(provider);

        let resume = ResumeDocument::new(RESUME, optimizer.extractor.as_ref());
        let job = JobPosting::new(JOB_TITLE, JOB_DESCRIPTION, optimizer.extractor.as_ref());
        let match_result = matching::score(&resume, &job, &optimizer.profile);

        let prompt = optimizer.build_prompt(&resume, &job, &match_result).unwrap();
        assert!(prompt.contains("MATCH ANALYSIS"));
        assert!(prompt.contains("Missing keywords"));
        assert!(prompt.contains("kubernetes"));
    }

    #[tokio::test]
    async fn test_deadline_bounds_total_wait() {
        let provider = Arc::new(
            MockLlmProvider::new(vec![Ok(GenerationResponse::new(
                valid_response(),
                "mock-model",
            ))])
            .with_delay(Duration::from_millis(200)),
        );
        let optimizer = optimizer_with(provider);

        let deadline = tokio::time::Instant::now() + Duration::from_millis(20);
        let err = optimizer
            .optimize_with_deadline(RESUME, JOB_TITLE, JOB_DESCRIPTION, deadline)
            .await
            .unwrap_err();
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_compute_survives_abandoned_deadline() {
        let provider = Arc::new(
            MockLlmProvider::new(vec![Ok(GenerationResponse::new(
                valid_response(),
                "mock-model",
            ))])
            .with_delay(Duration::from_millis(50)),
        );
        let optimizer = optimizer_with(provider.clone());

        let deadline = tokio::time::Instant::now() + Duration::from_millis(10);
        optimizer
            .optimize_with_deadline(RESUME, JOB_TITLE, JOB_DESCRIPTION, deadline)
            .await
            .unwrap_err();

        tokio::time::sleep(Duration::from_millis(150)).await;

        // The generation the first caller gave up on finished and was
        // cached; the repeat request never reaches the provider again.
        let outcome = optimizer
            .optimize(RESUME, JOB_TITLE, JOB_DESCRIPTION)
            .await
            .unwrap();
        assert_eq!(
            outcome.optimization.skills_to_add,
            vec!["kubernetes", "terraform"]
        );
        assert_eq!(provider.calls(), 1);
    }
}
