use async_trait::async_trait;

use crate::domain::PipelineError;

/// Trait for HTTP client operations (for mocking)
#[async_trait]
pub trait HttpClientTrait: Send + Sync + std::fmt::Debug {
    async fn post_json(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, PipelineError>;
}

/// Real HTTP client using reqwest.
///
/// Failures are classified at this edge: connection problems, timeouts,
/// HTTP 429 and 5xx become transient errors, any other non-success status
/// is fatal.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    pub fn with_timeout(timeout: std::time::Duration) -> Result<Self, PipelineError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PipelineError::internal(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    fn classify_send_error(e: reqwest::Error) -> PipelineError {
        if e.is_timeout() || e.is_connect() {
            PipelineError::transient(format!("request failed: {}", e))
        } else {
            PipelineError::fatal(format!("request failed: {}", e))
        }
    }

    fn classify_status(status: reqwest::StatusCode, body: &str) -> PipelineError {
        let message = format!("HTTP {}: {}", status, body);
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
            PipelineError::transient(message)
        } else {
            PipelineError::fatal(message)
        }
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClientTrait for HttpClient {
    async fn post_json(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, PipelineError> {
        let mut request = self.client.post(url);

        for (key, value) in headers {
            request = request.header(key, value);
        }

        let response = request
            .json(body)
            .send()
            .await
            .map_err(Self::classify_send_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(Self::classify_status(status, &error_body));
        }

        response
            .json()
            .await
            .map_err(|e| PipelineError::fatal(format!("failed to parse response: {}", e)))
    }
}
