//! The six storage namespaces.

use std::fmt;

/// A logical namespace with a fixed storage key and export name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Namespace {
    HighScore,
    TotalPoints,
    MaxStreak,
    QuizHistory,
    CustomQuestions,
    UserProfile,
}

impl Namespace {
    pub const ALL: [Namespace; 6] = [
        Namespace::HighScore,
        Namespace::TotalPoints,
        Namespace::MaxStreak,
        Namespace::QuizHistory,
        Namespace::CustomQuestions,
        Namespace::UserProfile,
    ];

    /// Key in the backend.
    pub fn key(self) -> &'static str {
        match self {
            Namespace::HighScore => "trivia_high_score",
            Namespace::TotalPoints => "trivia_total_points",
            Namespace::MaxStreak => "trivia_max_streak",
            Namespace::QuizHistory => "trivia_quiz_history",
            Namespace::CustomQuestions => "trivia_custom_questions",
            Namespace::UserProfile => "trivia_user_profile",
        }
    }

    /// Name used in export snapshots.
    pub fn export_name(self) -> &'static str {
        match self {
            Namespace::HighScore => "HIGH_SCORE",
            Namespace::TotalPoints => "TOTAL_POINTS",
            Namespace::MaxStreak => "MAX_STREAK",
            Namespace::QuizHistory => "QUIZ_HISTORY",
            Namespace::CustomQuestions => "CUSTOM_QUESTIONS",
            Namespace::UserProfile => "USER_PROFILE",
        }
    }

    pub fn from_export_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ns| ns.export_name() == name)
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.export_name())
    }
}
