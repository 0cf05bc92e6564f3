//! Domain Errors
//!
//! Error types for pipeline operations, mapped to CLI exit codes.

use thiserror::Error;

/// Classification of external generation-service failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// Timeout, rate limit, overloaded upstream. Worth retrying.
    Retryable,
    /// Authentication failure, malformed request. Retrying cannot help.
    Fatal,
    /// The retry budget was consumed without a successful call.
    ExhaustedRetries,
}

impl std::fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiErrorKind::Retryable => write!(f, "retryable"),
            ApiErrorKind::Fatal => write!(f, "fatal"),
            ApiErrorKind::ExhaustedRetries => write!(f, "exhausted-retries"),
        }
    }
}

/// Pipeline errors
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Data error: {0}")]
    Data(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not found: {kind} '{id}'")]
    NotFound { kind: String, id: String },

    #[error("Template error: {0}")]
    Template(String),

    #[error("API error ({kind}): {message}")]
    Api { kind: ApiErrorKind, message: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Busy: {0}")]
    Busy(String),

    #[error("Publish error: {0}")]
    Publish(String),

    #[error("Storage error: {0}")]
    Io(String),
}

impl PipelineError {
    pub fn not_found(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind: kind.into(),
            id: id.into(),
        }
    }

    pub fn api_retryable(message: impl Into<String>) -> Self {
        Self::Api {
            kind: ApiErrorKind::Retryable,
            message: message.into(),
        }
    }

    pub fn api_fatal(message: impl Into<String>) -> Self {
        Self::Api {
            kind: ApiErrorKind::Fatal,
            message: message.into(),
        }
    }

    /// Whether the error is a transient generation-service failure.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Api {
                kind: ApiErrorKind::Retryable,
                ..
            }
        )
    }

    /// Process exit code for the CLI surface.
    ///
    /// 1 = user/configuration error, 2 = external-service error,
    /// 3 = validation failure, 4 = publish contention.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_)
            | Self::Data(_)
            | Self::Conflict(_)
            | Self::NotFound { .. }
            | Self::Template(_)
            | Self::Io(_) => 1,
            Self::Api { .. } => 2,
            Self::Validation(_) => 3,
            Self::Busy(_) | Self::Publish(_) => 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_mapping() {
        assert_eq!(PipelineError::Config("x".into()).exit_code(), 1);
        assert_eq!(PipelineError::not_found("prompt", "p1").exit_code(), 1);
        assert_eq!(PipelineError::api_fatal("401").exit_code(), 2);
        assert_eq!(PipelineError::Validation("short".into()).exit_code(), 3);
        assert_eq!(PipelineError::Busy("lock".into()).exit_code(), 4);
        assert_eq!(PipelineError::Publish("push".into()).exit_code(), 4);
    }

    #[test]
    fn test_retryable_classification() {
        assert!(PipelineError::api_retryable("429").is_retryable());
        assert!(!PipelineError::api_fatal("401").is_retryable());
        assert!(!PipelineError::Validation("x".into()).is_retryable());
    }
}
