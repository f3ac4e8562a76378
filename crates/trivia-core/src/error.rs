//! Error types shared across the trivia crates.
//!
//! `SourceError` is defined here rather than in `trivia-providers` so the
//! fetcher and the engine can classify failures without string matching.

use thiserror::Error;

/// Errors raised by a remote question source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// A network error occurred.
    #[error("network error: {0}")]
    Network(String),

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// The server answered with a non-success HTTP status.
    #[error("HTTP error (status {status}): {message}")]
    HttpStatus { status: u16, message: String },

    /// The question API answered with a non-zero response code.
    #[error("API response code {code}: {message}")]
    ResponseCode { code: u8, message: String },

    /// The response body could not be decoded.
    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl SourceError {
    /// Returns `true` if the failure came from the API itself rather than
    /// from the transport.
    pub fn is_api_failure(&self) -> bool {
        matches!(self, SourceError::ResponseCode { .. })
    }
}

/// Errors that end a quiz without a result.
#[derive(Debug, Error)]
pub enum QuizError {
    /// Every source came back empty.
    #[error("unable to load any questions")]
    NoQuestions,

    /// The player quit, or the input stream closed mid-quiz.
    #[error("quiz abandoned at question {question} of {total}")]
    Abandoned { question: usize, total: usize },

    /// A session operation was called in the wrong phase.
    #[error("invalid session transition: {0}")]
    InvalidTransition(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_api_failures() {
        let api = SourceError::ResponseCode {
            code: 5,
            message: "Rate limit exceeded. Please wait.".into(),
        };
        assert!(api.is_api_failure());
        assert!(!SourceError::Timeout(10).is_api_failure());
        assert!(api.to_string().contains("Rate limit"));
    }

    #[test]
    fn abandoned_message_is_one_based() {
        let err = QuizError::Abandoned {
            question: 2,
            total: 5,
        };
        assert_eq!(err.to_string(), "quiz abandoned at question 2 of 5");
    }
}
