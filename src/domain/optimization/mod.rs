pub mod fingerprint;
pub mod result;
pub mod template;

pub use fingerprint::OptimizationFingerprint;
pub use result::{ExperienceTweak, OptimizationResult};
pub use template::{PromptTemplate, VAR_JOB_DESCRIPTION, VAR_RESUME_TEXT};
