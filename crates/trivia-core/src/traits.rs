//! Core trait definitions for question sources and persistence.
//!
//! These are implemented by the `trivia-providers` and `trivia-store` crates
//! and injected into the [`QuizEngine`](crate::engine::QuizEngine).

use async_trait::async_trait;

use crate::model::{CustomQuestion, NewQuizResult, Question, QuestionQuery, QuizResult, Stats};

// ---------------------------------------------------------------------------
// Question sources
// ---------------------------------------------------------------------------

/// A remote question bank that may fail.
#[async_trait]
pub trait QuestionProvider: Send + Sync {
    /// Human-readable source name (e.g. "opentdb").
    fn name(&self) -> &str;

    /// Fetch a batch of questions. Errors are `SourceError` values wrapped in
    /// `anyhow`.
    async fn fetch(&self, query: &QuestionQuery) -> anyhow::Result<Vec<Question>>;
}

/// Where the engine gets its questions. Never fails; an empty batch means
/// nothing could be produced.
#[async_trait]
pub trait QuestionBank: Send + Sync {
    async fn questions(&self, query: &QuestionQuery) -> Vec<Question>;
}

/// Locally authored questions, used as the first fallback tier.
pub trait CustomQuestionSource: Send + Sync {
    fn custom_questions(&self) -> Vec<CustomQuestion>;
}

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

/// Sink for finished quizzes.
pub trait ResultLedger: Send + Sync {
    /// Append to history, returning the stored record.
    fn add_quiz_result(&self, result: NewQuizResult) -> QuizResult;

    /// Fold a finished quiz into the lifetime stats and return the new totals.
    fn save_stats(&self, new_score: u64, points_earned: u64, streak: u32) -> Stats;
}
