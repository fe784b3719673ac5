pub mod cache;
pub mod llm;
pub mod logging;
pub mod optimizer;

pub use cache::{Cache, CacheExt, InMemoryCache, InMemoryCacheConfig, ResultCache};
pub use llm::{
    GeminiProvider, HttpClient, HttpClientTrait, LlmProviderFactory, OpenAiProvider, ProviderKind,
    ResilientLlmClient, RetryConfig,
};
pub use optimizer::{OptimizationOutcome, Optimizer};
