//! Retrying wrapper around an LLM provider.

use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use crate::domain::PipelineError;
use crate::domain::llm::{GenerationRequest, GenerationResponse, LlmProvider};

/// Retry behavior for transient provider failures.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Retries after the initial attempt. A value of 3 allows 4 attempts total.
    pub max_retries: u32,
    /// Base backoff in seconds. The delay after failed attempt `n` is
    /// `backoff_factor * 2^(n-1)`.
    pub backoff_factor: f64,
    /// Timeout applied to each individual attempt.
    pub request_timeout: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff_factor: 0.5,
            request_timeout: Duration::from_secs(5),
        }
    }
}

impl RetryConfig {
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Default::default()
        }
    }

    pub fn with_backoff_factor(mut self, factor: f64) -> Self {
        self.backoff_factor = factor;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Delay to sleep after the given failed attempt (1-indexed).
    pub fn delay_for_attempt(&self, failed_attempt: u32) -> Duration {
        let exponent = failed_attempt.saturating_sub(1);
        Duration::from_secs_f64(self.backoff_factor * 2f64.powi(exponent as i32))
    }
}

/// Wraps a provider with per-attempt timeouts and exponential backoff.
///
/// Only transient errors are retried. A fatal error returns immediately,
/// and the final transient error is returned once the retry budget is
/// exhausted.
#[derive(Clone)]
pub struct ResilientLlmClient {
    provider: Arc<dyn LlmProvider>,
    retry: RetryConfig,
}

impl std::fmt::Debug for ResilientLlmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResilientLlmClient")
            .field("model", &self.provider.model_name())
            .field("retry", &self.retry)
            .finish()
    }
}

impl ResilientLlmClient {
    pub fn new(provider: Arc<dyn LlmProvider>, retry: RetryConfig) -> Self {
        Self { provider, retry }
    }

    pub fn model_name(&self) -> &str {
        self.provider.model_name()
    }

    pub async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, PipelineError> {
        let max_attempts = self.retry.max_retries + 1;
        let mut attempt = 1u32;

        loop {
            let outcome =
                tokio::time::timeout(self.retry.request_timeout, self.provider.generate(request))
                    .await;

            let result = match outcome {
                Ok(result) => result,
                Err(_) => Err(PipelineError::transient(format!(
                    "attempt timed out after {:?}",
                    self.retry.request_timeout
                ))),
            };

            match result {
                Ok(response) => return Ok(response),
                Err(error) if error.is_retryable() && attempt < max_attempts => {
                    let delay = self.retry.delay_for_attempt(attempt);
                    warn!(
                        model = self.provider.model_name(),
                        attempt,
                        max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %error,
                        "generation attempt failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(error) => return Err(error),
            }
        }
    }

    /// Like [`generate`](Self::generate), but gives up at `deadline` even
    /// if retry budget remains.
    pub async fn generate_with_deadline(
        &self,
        request: &GenerationRequest,
        deadline: tokio::time::Instant,
    ) -> Result<GenerationResponse, PipelineError> {
        tokio::time::timeout_at(deadline, self.generate(request))
            .await
            .map_err(|_| PipelineError::transient("deadline exceeded before generation finished"))?
    }
}
