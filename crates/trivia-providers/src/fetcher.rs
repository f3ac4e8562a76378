//! Cached question fetcher with a fallback chain.
//!
//! Resolution order for a query:
//! 1. a cached batch for the same normalized query, if younger than the TTL;
//! 2. the remote source, whose successful batches are cached;
//! 3. the user's custom questions, sampled at random;
//! 4. the built-in pool.
//!
//! Tiers 3 and 4 are never cached, so the remote source is retried on the
//! next call.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use rand::seq::SliceRandom;
use tokio::time::Instant;

use trivia_core::error::SourceError;
use trivia_core::model::{Question, QuestionQuery};
use trivia_core::traits::{CustomQuestionSource, QuestionBank, QuestionProvider};

use crate::defaults::default_questions;

/// Default freshness window for cached batches.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

struct CacheEntry {
    questions: Vec<Question>,
    fetched_at: Instant,
}

/// Snapshot of the cache contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheInfo {
    pub size: usize,
    pub keys: Vec<QuestionQuery>,
}

/// Which tier produced a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOrigin {
    Cache,
    Remote,
    Custom,
    BuiltIn,
}

pub struct QuestionFetcher {
    source: Arc<dyn QuestionProvider>,
    custom: Arc<dyn CustomQuestionSource>,
    ttl: Duration,
    cache: Mutex<HashMap<QuestionQuery, CacheEntry>>,
}

impl QuestionFetcher {
    pub fn new(source: Arc<dyn QuestionProvider>, custom: Arc<dyn CustomQuestionSource>) -> Self {
        Self {
            source,
            custom,
            ttl: DEFAULT_CACHE_TTL,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Fetch a batch and report which tier served it.
    pub async fn fetch_with_origin(&self, query: &QuestionQuery) -> (Vec<Question>, BatchOrigin) {
        let key = query.normalized();

        if let Some(questions) = self.cached(&key) {
            tracing::debug!(?key, "serving questions from cache");
            return (questions, BatchOrigin::Cache);
        }

        match self.source.fetch(&key).await {
            Ok(questions) => {
                self.store(key, questions.clone());
                (questions, BatchOrigin::Remote)
            }
            Err(e) => {
                let source = self.source.name();
                match e.downcast_ref::<SourceError>() {
                    Some(err) if err.is_api_failure() => {
                        tracing::warn!(source, "question API refused request: {err}");
                    }
                    _ => tracing::warn!(source, "question fetch failed: {e:#}"),
                }
                self.fallback(key.amount as usize)
            }
        }
    }

    fn cached(&self, key: &QuestionQuery) -> Option<Vec<Question>> {
        let cache = self.cache.lock().ok()?;
        cache
            .get(key)
            .filter(|entry| entry.fetched_at.elapsed() < self.ttl)
            .map(|entry| entry.questions.clone())
    }

    fn store(&self, key: QuestionQuery, questions: Vec<Question>) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(
                key,
                CacheEntry {
                    questions,
                    fetched_at: Instant::now(),
                },
            );
        }
    }

    fn fallback(&self, amount: usize) -> (Vec<Question>, BatchOrigin) {
        let mut custom = self.custom.custom_questions();
        if !custom.is_empty() {
            custom.shuffle(&mut rand::thread_rng());
            let questions: Vec<Question> = custom
                .iter()
                .take(amount)
                .map(|q| q.to_question())
                .collect();
            tracing::info!(count = questions.len(), "using custom questions");
            return (questions, BatchOrigin::Custom);
        }

        tracing::info!("using built-in questions");
        (default_questions(amount), BatchOrigin::BuiltIn)
    }

    pub fn clear_cache(&self) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.clear();
        }
    }

    pub fn cache_info(&self) -> CacheInfo {
        match self.cache.lock() {
            Ok(cache) => CacheInfo {
                size: cache.len(),
                keys: cache.keys().cloned().collect(),
            },
            Err(_) => CacheInfo {
                size: 0,
                keys: Vec::new(),
            },
        }
    }
}

#[async_trait]
impl QuestionBank for QuestionFetcher {
    async fn questions(&self, query: &QuestionQuery) -> Vec<Question> {
        self.fetch_with_origin(query).await.0
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;
    use crate::mock::MockSource;
    use trivia_core::model::{CustomQuestion, Difficulty, NewCustomQuestion};

    struct FixedCustom(Vec<CustomQuestion>);

    impl CustomQuestionSource for FixedCustom {
        fn custom_questions(&self) -> Vec<CustomQuestion> {
            self.0.clone()
        }
    }

    fn remote_questions(n: usize) -> Vec<Question> {
        (0..n)
            .map(|i| Question {
                prompt: format!("Remote question {i}"),
                correct_answer: format!("answer {i}"),
                incorrect_answers: vec!["x".into(), "y".into(), "z".into()],
                category: "General Knowledge".into(),
                difficulty: Difficulty::Hard,
            })
            .collect()
    }

    fn custom(prompt: &str) -> CustomQuestion {
        NewCustomQuestion {
            question: prompt.into(),
            correct_answer: "yes".into(),
            wrong_answers: ["no".into(), "maybe".into(), "never".into()],
            category: None,
            difficulty: None,
        }
        .stamp(Uuid::new_v4(), Utc::now())
    }

    fn query(amount: u32) -> QuestionQuery {
        QuestionQuery {
            amount,
            ..Default::default()
        }
    }

    fn fetcher(source: Arc<MockSource>, custom: Vec<CustomQuestion>) -> QuestionFetcher {
        QuestionFetcher::new(source, Arc::new(FixedCustom(custom)))
    }

    #[tokio::test(start_paused = true)]
    async fn identical_queries_hit_cache_within_ttl() {
        let source = Arc::new(MockSource::new(remote_questions(10)));
        let fetcher = fetcher(source.clone(), vec![]);

        let (first, origin) = fetcher.fetch_with_origin(&query(5)).await;
        assert_eq!(origin, BatchOrigin::Remote);
        assert_eq!(first.len(), 5);

        tokio::time::advance(Duration::from_secs(299)).await;
        let (second, origin) = fetcher.fetch_with_origin(&query(5)).await;
        assert_eq!(origin, BatchOrigin::Cache);
        assert_eq!(first, second);
        assert_eq!(source.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_entries_are_refetched() {
        let source = Arc::new(MockSource::new(remote_questions(10)));
        let fetcher = fetcher(source.clone(), vec![]);

        fetcher.questions(&query(5)).await;
        tokio::time::advance(Duration::from_secs(300)).await;
        let (_, origin) = fetcher.fetch_with_origin(&query(5)).await;
        assert_eq!(origin, BatchOrigin::Remote);
        assert_eq!(source.call_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn different_parameters_never_share_an_entry() {
        let source = Arc::new(MockSource::new(remote_questions(10)));
        let fetcher = fetcher(source.clone(), vec![]);

        fetcher.questions(&query(5)).await;
        fetcher.questions(&query(3)).await;
        fetcher
            .questions(&QuestionQuery {
                difficulty: Some(Difficulty::Easy),
                amount: 5,
                ..Default::default()
            })
            .await;
        assert_eq!(source.call_count(), 3);
        assert_eq!(fetcher.cache_info().size, 3);

        // Blank category normalizes onto the same key as no category.
        fetcher
            .questions(&QuestionQuery {
                category: Some(String::new()),
                amount: 5,
                ..Default::default()
            })
            .await;
        assert_eq!(source.call_count(), 3);
    }

    #[tokio::test]
    async fn failure_falls_back_to_custom_questions() {
        let source = Arc::new(MockSource::failing());
        let fetcher = fetcher(
            source.clone(),
            vec![custom("c1"), custom("c2"), custom("c3")],
        );

        let (questions, origin) = fetcher.fetch_with_origin(&query(2)).await;
        assert_eq!(origin, BatchOrigin::Custom);
        assert_eq!(questions.len(), 2);
        assert_ne!(questions[0].prompt, questions[1].prompt);
        assert!(questions.iter().all(|q| q.category == "Custom"));

        let (questions, _) = fetcher.fetch_with_origin(&query(10)).await;
        assert_eq!(questions.len(), 3);
    }

    #[tokio::test]
    async fn failure_without_custom_uses_builtin_pool() {
        let source = Arc::new(MockSource::failing());
        let fetcher = fetcher(source.clone(), vec![]);

        let (questions, origin) = fetcher.fetch_with_origin(&query(3)).await;
        assert_eq!(origin, BatchOrigin::BuiltIn);
        assert_eq!(questions.len(), 3);

        assert_eq!(fetcher.questions(&query(8)).await.len(), 5);
    }

    #[tokio::test]
    async fn fallback_batches_are_not_cached() {
        let source = Arc::new(MockSource::failing());
        let fetcher = fetcher(source.clone(), vec![]);

        fetcher.questions(&query(5)).await;
        assert_eq!(fetcher.cache_info().size, 0);

        source.set_failing(false);
        let (_, origin) = fetcher.fetch_with_origin(&query(5)).await;
        assert_eq!(origin, BatchOrigin::Remote);
        assert_eq!(source.call_count(), 2);
    }

    #[tokio::test]
    async fn clear_cache_forces_refetch() {
        let source = Arc::new(MockSource::new(remote_questions(5)));
        let fetcher = fetcher(source.clone(), vec![]);

        fetcher.questions(&query(5)).await;
        fetcher.clear_cache();
        assert_eq!(fetcher.cache_info().size, 0);
        fetcher.questions(&query(5)).await;
        assert_eq!(source.call_count(), 2);
    }
}
