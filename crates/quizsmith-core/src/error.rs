//! Error types.
//!
//! `ProviderError` is defined here rather than in `quizsmith-providers` so the
//! quiz service can downcast and classify provider failures for retry
//! decisions without string matching.

use thiserror::Error;

/// Errors that can occur when interacting with an LLM provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The API returned a 429 rate limit response.
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// Authentication failed (invalid API key).
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The requested model was not found.
    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// The API returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    NetworkError(String),
}

impl ProviderError {
    /// Returns `true` if this error is permanent and should not be retried.
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            ProviderError::AuthenticationFailed(_) | ProviderError::ModelNotFound(_)
        )
    }

    /// Returns the retry-after delay in milliseconds, if applicable.
    pub fn retry_after_ms(&self) -> Option<u64> {
        match self {
            ProviderError::RateLimited { retry_after_ms } => Some(*retry_after_ms),
            _ => None,
        }
    }
}

/// Faults raised while scoring a submission.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoreError {
    /// A stored correct-answer label has no option at its position.
    ///
    /// This points at corrupted persistence or an upstream parsing bug and
    /// will not resolve on retry.
    #[error(
        "inconsistent question data: question {question_id} declares answer '{label}' \
         but has {option_count} option(s)"
    )]
    InconsistentQuestionData {
        question_id: String,
        label: String,
        option_count: usize,
    },
}

/// Domain errors raised by the quiz service.
#[derive(Debug, Error)]
pub enum QuizError {
    /// Neither a subject nor any document text was supplied.
    #[error("no source material: {0}")]
    EmptySource(String),

    /// The generation request is malformed.
    #[error("invalid quiz request: {0}")]
    InvalidRequest(String),

    #[error("quiz not found: {0}")]
    QuizNotFound(String),

    #[error("quiz attempt not found: {0}")]
    AttemptNotFound(String),

    /// The attempt belongs to another user.
    #[error("not authorized to access quiz attempt {0}")]
    Forbidden(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permanent_provider_errors() {
        assert!(ProviderError::AuthenticationFailed("bad key".into()).is_permanent());
        assert!(ProviderError::ModelNotFound("gpt-0".into()).is_permanent());
        assert!(!ProviderError::Timeout(30).is_permanent());
        assert!(!ProviderError::RateLimited {
            retry_after_ms: 500
        }
        .is_permanent());
    }

    #[test]
    fn retry_hint_only_for_rate_limits() {
        let limited = ProviderError::RateLimited {
            retry_after_ms: 5000,
        };
        assert_eq!(limited.retry_after_ms(), Some(5000));
        assert_eq!(ProviderError::NetworkError("reset".into()).retry_after_ms(), None);
    }

    #[test]
    fn inconsistent_data_message_names_the_label() {
        let err = ScoreError::InconsistentQuestionData {
            question_id: "q1".into(),
            label: "E".into(),
            option_count: 4,
        };
        let msg = err.to_string();
        assert!(msg.contains("q1"));
        assert!(msg.contains("'E'"));
        assert!(msg.contains("4 option(s)"));
    }
}
