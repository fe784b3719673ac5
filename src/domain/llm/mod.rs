pub mod provider;
pub mod request;
pub mod response;

pub use provider::LlmProvider;
pub use request::GenerationRequest;
pub use response::GenerationResponse;
