use async_trait::async_trait;

use crate::domain::PipelineError;
use crate::domain::llm::{GenerationRequest, GenerationResponse};

/// A text generation backend.
///
/// Implementations classify their failures: anything worth retrying is a
/// `Transient` error, everything else is `Fatal`. The resilient client
/// relies on that split to decide whether another attempt makes sense.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Runs one generation attempt. No retries happen at this level.
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, PipelineError>;

    /// The model this provider targets, for logging.
    fn model_name(&self) -> &str;
}
