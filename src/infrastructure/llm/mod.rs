pub mod factory;
pub mod gemini;
pub mod http_client;
pub mod openai;
pub mod resilient;

pub use factory::{LlmProviderFactory, ProviderKind};
pub use gemini::GeminiProvider;
pub use http_client::{HttpClient, HttpClientTrait};
pub use openai::OpenAiProvider;
pub use resilient::{ResilientLlmClient, RetryConfig};
