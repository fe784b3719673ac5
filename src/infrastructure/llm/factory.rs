use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::gemini::GeminiProvider;
use super::http_client::HttpClient;
use super::openai::OpenAiProvider;
use crate::domain::PipelineError;
use crate::domain::llm::LlmProvider;

/// Supported LLM backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Gemini,
    OpenAi,
}

impl ProviderKind {
    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "gemini-1.5-flash",
            ProviderKind::OpenAi => "gpt-4o-mini",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderKind::Gemini => write!(f, "gemini"),
            ProviderKind::OpenAi => write!(f, "openai"),
        }
    }
}

/// Factory for creating LLM providers
#[derive(Debug)]
pub struct LlmProviderFactory;

impl LlmProviderFactory {
    /// Create a provider for the given backend with a per-request timeout
    /// applied at the HTTP layer.
    pub fn create(
        kind: ProviderKind,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Arc<dyn LlmProvider>, PipelineError> {
        let http_client = HttpClient::with_timeout(timeout)?;

        match kind {
            ProviderKind::Gemini => Ok(Arc::new(GeminiProvider::new(http_client, api_key, model))),
            ProviderKind::OpenAi => Ok(Arc::new(OpenAiProvider::new(http_client, api_key, model))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_kind_deserializes_lowercase() {
        let kind: ProviderKind = serde_json::from_str("\"gemini\"").unwrap();
        assert_eq!(kind, ProviderKind::Gemini);

        let kind: ProviderKind = serde_json::from_str("\"openai\"").unwrap();
        assert_eq!(kind, ProviderKind::OpenAi);
    }

    #[test]
    fn test_default_models() {
        assert_eq!(ProviderKind::Gemini.default_model(), "gemini-1.5-flash");
        assert_eq!(ProviderKind::OpenAi.default_model(), "gpt-4o-mini");
    }

    #[test]
    fn test_create_returns_provider_with_model() {
        let provider = LlmProviderFactory::create(
            ProviderKind::Gemini,
            "key",
            "gemini-1.5-flash",
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(provider.model_name(), "gemini-1.5-flash");
    }
}
