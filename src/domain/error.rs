use thiserror::Error;

/// Core pipeline errors.
///
/// `Clone` is required so a failed in-flight optimization can be fanned out
/// to every caller waiting on the same fingerprint.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PipelineError {
    #[error("validation error: {message}")]
    Validation { message: String },

    #[error("transient error: {message}")]
    Transient { message: String },

    #[error("fatal error: {message}")]
    Fatal { message: String },

    #[error("invalid match profile: {message}")]
    Profile { message: String },

    #[error("cache degraded: {message}")]
    CacheDegraded { message: String },

    #[error("template error: {message}")]
    Template { message: String },

    #[error("internal error: {message}")]
    Internal { message: String },
}

impl PipelineError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn transient(message: impl Into<String>) -> Self {
        Self::Transient {
            message: message.into(),
        }
    }

    pub fn fatal(message: impl Into<String>) -> Self {
        Self::Fatal {
            message: message.into(),
        }
    }

    pub fn profile(message: impl Into<String>) -> Self {
        Self::Profile {
            message: message.into(),
        }
    }

    pub fn cache_degraded(message: impl Into<String>) -> Self {
        Self::CacheDegraded {
            message: message.into(),
        }
    }

    pub fn template(message: impl Into<String>) -> Self {
        Self::Template {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether the retrying client may issue another attempt for this error.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient { .. })
    }
}
