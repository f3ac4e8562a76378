//! Mock question source for testing.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use trivia_core::error::SourceError;
use trivia_core::model::{Question, QuestionQuery};
use trivia_core::traits::QuestionProvider;

/// A question source that serves canned questions without network access.
///
/// Can be switched into a failing mode to exercise the fallback chain.
pub struct MockSource {
    /// Questions served, truncated to the requested amount.
    questions: Vec<Question>,
    /// Whether fetches currently fail.
    failing: AtomicBool,
    /// Number of calls made.
    call_count: AtomicU32,
    /// Last query received.
    last_query: Mutex<Option<QuestionQuery>>,
}

impl MockSource {
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            questions,
            failing: AtomicBool::new(false),
            call_count: AtomicU32::new(0),
            last_query: Mutex::new(None),
        }
    }

    /// A source whose every fetch fails with a network error.
    pub fn failing() -> Self {
        let source = Self::new(Vec::new());
        source.set_failing(true);
        source
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::Relaxed);
    }

    /// Get the number of calls made to this source.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Get the last query made to this source.
    pub fn last_query(&self) -> Option<QuestionQuery> {
        self.last_query.lock().ok().and_then(|q| q.clone())
    }
}

#[async_trait]
impl QuestionProvider for MockSource {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch(&self, query: &QuestionQuery) -> anyhow::Result<Vec<Question>> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut last) = self.last_query.lock() {
            *last = Some(query.clone());
        }

        if self.failing.load(Ordering::Relaxed) {
            return Err(SourceError::Network("mock source is offline".into()).into());
        }

        Ok(self
            .questions
            .iter()
            .take(query.amount as usize)
            .cloned()
            .collect())
    }
}
