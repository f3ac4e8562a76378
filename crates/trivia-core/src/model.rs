//! Core data model types for trivia.
//!
//! Questions as fetched from a source, the queries that select them, and the
//! records that outlive a quiz: results, stats, custom questions, and the
//! user profile.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Number of questions requested when the caller does not say.
pub const DEFAULT_AMOUNT: u32 = 5;

/// Question difficulty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

/// A multiple-choice question. Immutable once fetched.
///
/// Text may still carry HTML entities exactly as the source delivered it;
/// decoding happens when the question is presented.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub prompt: String,
    pub correct_answer: String,
    pub incorrect_answers: Vec<String>,
    pub category: String,
    pub difficulty: Difficulty,
}

/// Parameters selecting a batch of questions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuestionQuery {
    /// Opaque category identifier understood by the remote source.
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    #[serde(default = "default_amount")]
    pub amount: u32,
}

fn default_amount() -> u32 {
    DEFAULT_AMOUNT
}

impl Default for QuestionQuery {
    fn default() -> Self {
        Self {
            category: None,
            difficulty: None,
            amount: DEFAULT_AMOUNT,
        }
    }
}

impl QuestionQuery {
    /// Canonical form used as a cache key: blank categories become `None`
    /// and a zero amount becomes the default.
    pub fn normalized(&self) -> Self {
        Self {
            category: self
                .category
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string),
            difficulty: self.difficulty,
            amount: if self.amount == 0 {
                DEFAULT_AMOUNT
            } else {
                self.amount
            },
        }
    }
}

/// A finished quiz, as kept in history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizResult {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    pub score: u32,
    pub total_questions: u32,
    /// Percentage of questions answered correctly, rounded.
    pub accuracy: u32,
    /// Average seconds per question, one decimal place.
    pub avg_time_secs: f64,
    pub points: u64,
    pub category: String,
    pub difficulty: String,
}

/// A quiz result before the store stamps it with an id and date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewQuizResult {
    pub score: u32,
    pub total_questions: u32,
    pub accuracy: u32,
    pub avg_time_secs: f64,
    pub points: u64,
    pub category: String,
    pub difficulty: String,
}

impl NewQuizResult {
    pub fn stamp(self, id: Uuid, date: DateTime<Utc>) -> QuizResult {
        QuizResult {
            id,
            date,
            score: self.score,
            total_questions: self.total_questions,
            accuracy: self.accuracy,
            avg_time_secs: self.avg_time_secs,
            points: self.points,
            category: self.category,
            difficulty: self.difficulty,
        }
    }
}

/// Lifetime stats. `high_score` and `max_streak` only grow; `total_points`
/// accumulates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub high_score: u64,
    pub total_points: u64,
    pub max_streak: u32,
}

/// A question written by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomQuestion {
    pub id: Uuid,
    pub created: DateTime<Utc>,
    pub question: String,
    pub correct_answer: String,
    pub wrong_answers: [String; 3],
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
}

impl CustomQuestion {
    /// Adapt to the shape of a fetched question.
    pub fn to_question(&self) -> Question {
        Question {
            prompt: self.question.clone(),
            correct_answer: self.correct_answer.clone(),
            incorrect_answers: self.wrong_answers.to_vec(),
            category: self
                .category
                .clone()
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| "Custom".to_string()),
            difficulty: self.difficulty.unwrap_or_default(),
        }
    }
}

/// A custom question before the store assigns an id and creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCustomQuestion {
    pub question: String,
    pub correct_answer: String,
    pub wrong_answers: [String; 3],
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
}

impl NewCustomQuestion {
    /// Names of required fields that are blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.question.trim().is_empty() {
            missing.push("question");
        }
        if self.correct_answer.trim().is_empty() {
            missing.push("correct answer");
        }
        if self.wrong_answers.iter().any(|a| a.trim().is_empty()) {
            missing.push("wrong answers");
        }
        missing
    }

    pub fn stamp(self, id: Uuid, created: DateTime<Utc>) -> CustomQuestion {
        CustomQuestion {
            id,
            created,
            question: self.question,
            correct_answer: self.correct_answer,
            wrong_answers: self.wrong_answers,
            category: self.category,
            difficulty: self.difficulty,
        }
    }
}

/// Partial update for a custom question. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomQuestionUpdate {
    pub question: Option<String>,
    pub correct_answer: Option<String>,
    pub wrong_answers: Option<[String; 3]>,
    pub category: Option<String>,
    pub difficulty: Option<Difficulty>,
}

impl CustomQuestionUpdate {
    pub fn apply_to(self, target: &mut CustomQuestion) {
        if let Some(question) = self.question {
            target.question = question;
        }
        if let Some(correct) = self.correct_answer {
            target.correct_answer = correct;
        }
        if let Some(wrong) = self.wrong_answers {
            target.wrong_answers = wrong;
        }
        if let Some(category) = self.category {
            target.category = Some(category);
        }
        if let Some(difficulty) = self.difficulty {
            target.difficulty = Some(difficulty);
        }
    }
}

/// Quiz defaults chosen by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub default_category: Option<String>,
    #[serde(default)]
    pub default_difficulty: Option<Difficulty>,
    #[serde(default = "default_amount")]
    pub default_questions: u32,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            default_category: None,
            default_difficulty: None,
            default_questions: DEFAULT_AMOUNT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub avatar: String,
    #[serde(default)]
    pub preferences: Preferences,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            name: "Player".to_string(),
            avatar: "🧠".to_string(),
            preferences: Preferences::default(),
        }
    }
}

/// Partial update for the user profile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub preferences: Option<Preferences>,
}

impl ProfileUpdate {
    pub fn apply_to(self, profile: &mut UserProfile) {
        if let Some(name) = self.name {
            profile.name = name;
        }
        if let Some(avatar) = self.avatar {
            profile.avatar = avatar;
        }
        if let Some(preferences) = self.preferences {
            profile.preferences = preferences;
        }
    }
}
