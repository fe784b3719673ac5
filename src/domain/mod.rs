pub mod document;
pub mod error;
pub mod keywords;
pub mod llm;
pub mod matching;
pub mod optimization;

pub use document::{JobPosting, ResumeDocument};
pub use error::PipelineError;
pub use keywords::{KeywordExtractor, RegexKeywordExtractor};
pub use matching::{MatchMode, MatchProfile, MatchResult};
pub use optimization::{OptimizationFingerprint, OptimizationResult, PromptTemplate};
