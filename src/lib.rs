//! Resume Match Pipeline
//!
//! Scores resumes against job postings and orchestrates LLM-backed
//! optimization suggestions:
//! - Multi-signal match scoring (TF-IDF cosine, keyword overlap, title overlap)
//! - Strict / standard / lenient matching profiles
//! - Fingerprint-keyed result caching with request coalescing
//! - Retrying provider clients (Gemini, OpenAI) with bounded backoff

pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
pub use domain::{
    JobPosting, KeywordExtractor, MatchMode, MatchProfile, MatchResult, OptimizationFingerprint,
    OptimizationResult, PipelineError, PromptTemplate, RegexKeywordExtractor, ResumeDocument,
};
pub use infrastructure::{
    InMemoryCache, LlmProviderFactory, OptimizationOutcome, Optimizer, ProviderKind,
    ResilientLlmClient, ResultCache, RetryConfig,
};

use std::sync::Arc;

/// Wires an [`Optimizer`] from configuration. The caller supplies the API
/// key through `config.llm.api_key` (usually via the `APP__LLM__API_KEY`
/// environment variable).
pub fn build_optimizer(config: &AppConfig) -> Result<Optimizer, PipelineError> {
    let provider = LlmProviderFactory::create(
        config.llm.provider,
        config.llm.api_key.clone(),
        config.llm.model(),
        config.llm.timeout(),
    )?;

    let client = ResilientLlmClient::new(provider, config.llm.retry_config());

    let store = Arc::new(InMemoryCache::with_config(
        infrastructure::InMemoryCacheConfig::default()
            .with_max_capacity(config.cache.max_capacity)
            .with_default_ttl(config.cache.ttl()),
    ));
    let cache = ResultCache::new(store, config.cache.ttl());

    let profile = config.matching.profile()?;

    Ok(Optimizer::new(client, cache)
        .with_profile(profile)
        .with_temperature(config.llm.temperature)
        .with_max_output_tokens(config.llm.max_output_tokens))
}
