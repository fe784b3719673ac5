use std::time::Duration;

use serde::Deserialize;

use crate::domain::matching::{MatchMode, MatchProfile};
use crate::domain::PipelineError;
use crate::infrastructure::llm::{ProviderKind, RetryConfig};

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub matching: MatchingConfig,
    pub cache: CacheConfig,
    pub llm: LlmConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    pub mode: MatchMode,
    pub tfidf_weight: f64,
    pub keyword_weight: f64,
    pub title_weight: f64,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            mode: MatchMode::Standard,
            tfidf_weight: 0.55,
            keyword_weight: 0.35,
            title_weight: 0.10,
        }
    }
}

impl MatchingConfig {
    /// Builds the scoring profile, validating the configured weights.
    pub fn profile(&self) -> Result<MatchProfile, PipelineError> {
        MatchProfile::new(
            self.mode,
            self.tfidf_weight,
            self.keyword_weight,
            self.title_weight,
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub ttl_seconds: u64,
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: 3600,
            max_capacity: 10_000,
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub provider: ProviderKind,
    /// Model name; falls back to the provider's default when empty.
    pub model: Option<String>,
    pub api_key: String,
    pub timeout_seconds: u64,
    pub max_retries: u32,
    pub backoff_factor: f64,
    pub temperature: f64,
    pub max_output_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Gemini,
            model: None,
            api_key: String::new(),
            timeout_seconds: 5,
            max_retries: 3,
            backoff_factor: 0.5,
            temperature: 0.2,
            max_output_tokens: 2048,
        }
    }
}

impl LlmConfig {
    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.provider.default_model())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig::new(self.max_retries)
            .with_backoff_factor(self.backoff_factor)
            .with_request_timeout(self.timeout())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
