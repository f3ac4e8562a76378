//! Typed accessors over the six namespaces.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use trivia_core::model::{
    CustomQuestion, CustomQuestionUpdate, NewCustomQuestion, NewQuizResult, ProfileUpdate,
    QuizResult, Stats, UserProfile,
};
use trivia_core::traits::{CustomQuestionSource, ResultLedger};

use crate::backend::{FileBackend, KvBackend, MemoryBackend};
use crate::error::StoreError;
use crate::keys::Namespace;

/// Most results kept in history.
pub const HISTORY_LIMIT: usize = 50;

/// Export format: export name to stored JSON value (`null` when absent).
pub type Snapshot = BTreeMap<String, serde_json::Value>;

/// Trivia persistence over a [`KvBackend`].
///
/// Nothing here returns an error. Unreadable values read as absent and
/// failed writes are logged, so a broken store never interrupts a quiz.
#[derive(Clone)]
pub struct TriviaStore {
    backend: Arc<dyn KvBackend>,
}

impl TriviaStore {
    pub fn new(backend: Arc<dyn KvBackend>) -> Self {
        Self { backend }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryBackend::new()))
    }

    /// Store backed by JSON files in `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        Self::new(Arc::new(FileBackend::new(dir)))
    }

    /// Read and deserialize a namespace; `None` if absent or unreadable.
    pub fn get<T: DeserializeOwned>(&self, ns: Namespace) -> Option<T> {
        let raw = match self.backend.get(ns.key()) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(key = ns.key(), "error reading from storage: {e}");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key = ns.key(), "discarding unreadable value: {e}");
                None
            }
        }
    }

    /// Serialize and write a namespace. Returns whether the write succeeded.
    pub fn set<T: Serialize + ?Sized>(&self, ns: Namespace, value: &T) -> bool {
        let result = serde_json::to_string(value)
            .map_err(|source| StoreError::Serialize {
                key: ns.key().to_string(),
                source,
            })
            .and_then(|json| self.backend.set(ns.key(), &json));

        match result {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(key = ns.key(), "error writing to storage: {e}");
                false
            }
        }
    }

    pub fn remove(&self, ns: Namespace) -> bool {
        match self.backend.remove(ns.key()) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(key = ns.key(), "error removing from storage: {e}");
                false
            }
        }
    }

    // -- Stats --

    pub fn stats(&self) -> Stats {
        Stats {
            high_score: self.get(Namespace::HighScore).unwrap_or(0),
            total_points: self.get(Namespace::TotalPoints).unwrap_or(0),
            max_streak: self.get(Namespace::MaxStreak).unwrap_or(0),
        }
    }

    /// Fold one finished quiz into the lifetime stats.
    ///
    /// `high_score` and `max_streak` are replaced only when exceeded;
    /// `points_earned` is added to `total_points`.
    pub fn save_stats(&self, new_score: u64, points_earned: u64, streak: u32) -> Stats {
        let stats = self.stats();

        if new_score > stats.high_score {
            self.set(Namespace::HighScore, &new_score);
        }
        if streak > stats.max_streak {
            self.set(Namespace::MaxStreak, &streak);
        }
        self.set(
            Namespace::TotalPoints,
            &stats.total_points.saturating_add(points_earned),
        );

        self.stats()
    }

    // -- Quiz history --

    /// History, newest first.
    pub fn quiz_history(&self) -> Vec<QuizResult> {
        self.get(Namespace::QuizHistory).unwrap_or_default()
    }

    /// Prepend a result, evicting the oldest beyond [`HISTORY_LIMIT`].
    pub fn add_quiz_result(&self, result: NewQuizResult) -> QuizResult {
        let stored = result.stamp(Uuid::new_v4(), Utc::now());

        let mut history = self.quiz_history();
        history.insert(0, stored.clone());
        history.truncate(HISTORY_LIMIT);
        self.set(Namespace::QuizHistory, &history);

        tracing::debug!(id = %stored.id, "recorded quiz result");
        stored
    }

    /// Delete a result by id. Returns whether anything was removed.
    pub fn delete_quiz_result(&self, id: Uuid) -> bool {
        let mut history = self.quiz_history();
        let before = history.len();
        history.retain(|r| r.id != id);
        if history.len() == before {
            return false;
        }
        self.set(Namespace::QuizHistory, &history)
    }

    /// Add the demonstration results if history is empty. Returns how many
    /// were added.
    pub fn seed_sample_history(&self) -> usize {
        if !self.quiz_history().is_empty() {
            return 0;
        }

        let samples = [
            (4, 80, 15.2, 450, "Science", "medium"),
            (3, 60, 18.5, 350, "History", "easy"),
            (5, 100, 12.1, 550, "Geography", "hard"),
        ];
        for (score, accuracy, avg_time_secs, points, category, difficulty) in samples {
            self.add_quiz_result(NewQuizResult {
                score,
                total_questions: 5,
                accuracy,
                avg_time_secs,
                points,
                category: category.to_string(),
                difficulty: difficulty.to_string(),
            });
        }
        samples.len()
    }

    // -- Custom questions --

    /// Custom questions in creation order.
    pub fn custom_questions(&self) -> Vec<CustomQuestion> {
        self.get(Namespace::CustomQuestions).unwrap_or_default()
    }

    pub fn add_custom_question(&self, question: NewCustomQuestion) -> CustomQuestion {
        let stored = question.stamp(Uuid::new_v4(), Utc::now());
        let mut questions = self.custom_questions();
        questions.push(stored.clone());
        self.set(Namespace::CustomQuestions, &questions);
        stored
    }

    /// Merge `update` into the question with `id`. `None` if no such question.
    pub fn update_custom_question(
        &self,
        id: Uuid,
        update: CustomQuestionUpdate,
    ) -> Option<CustomQuestion> {
        let mut questions = self.custom_questions();
        let target = questions.iter_mut().find(|q| q.id == id)?;
        update.apply_to(target);
        let updated = target.clone();
        self.set(Namespace::CustomQuestions, &questions);
        Some(updated)
    }

    pub fn delete_custom_question(&self, id: Uuid) -> bool {
        let mut questions = self.custom_questions();
        let before = questions.len();
        questions.retain(|q| q.id != id);
        if questions.len() == before {
            return false;
        }
        self.set(Namespace::CustomQuestions, &questions)
    }

    // -- Profile --

    pub fn user_profile(&self) -> UserProfile {
        self.get(Namespace::UserProfile).unwrap_or_default()
    }

    pub fn update_user_profile(&self, update: ProfileUpdate) -> UserProfile {
        let mut profile = self.user_profile();
        update.apply_to(&mut profile);
        self.set(Namespace::UserProfile, &profile);
        profile
    }

    // -- Bulk operations --

    pub fn clear_all(&self) {
        for ns in Namespace::ALL {
            self.remove(ns);
        }
        tracing::info!("cleared all stored data");
    }

    /// Snapshot every namespace under its export name.
    pub fn export(&self) -> Snapshot {
        Namespace::ALL
            .into_iter()
            .map(|ns| {
                let value = self
                    .get::<serde_json::Value>(ns)
                    .unwrap_or(serde_json::Value::Null);
                (ns.export_name().to_string(), value)
            })
            .collect()
    }

    /// Apply a (possibly partial) snapshot. Unknown names and `null` values
    /// are skipped. Returns the number of namespaces written.
    pub fn import(&self, snapshot: &Snapshot) -> usize {
        let mut written = 0;
        for (name, value) in snapshot {
            let Some(ns) = Namespace::from_export_name(name) else {
                tracing::debug!(name = %name, "skipping unknown namespace in import");
                continue;
            };
            if value.is_null() {
                continue;
            }
            if self.set(ns, value) {
                written += 1;
            }
        }
        written
    }
}

impl CustomQuestionSource for TriviaStore {
    fn custom_questions(&self) -> Vec<CustomQuestion> {
        TriviaStore::custom_questions(self)
    }
}

impl ResultLedger for TriviaStore {
    fn add_quiz_result(&self, result: NewQuizResult) -> QuizResult {
        TriviaStore::add_quiz_result(self, result)
    }

    fn save_stats(&self, new_score: u64, points_earned: u64, streak: u32) -> Stats {
        TriviaStore::save_stats(self, new_score, points_earned, streak)
    }
}
