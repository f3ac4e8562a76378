//! Aggregate statistics over quiz history.
//!
//! Everything here is computed from the stored history and lifetime stats;
//! nothing is persisted.

use serde::{Deserialize, Serialize};

use crate::model::{QuizResult, Stats};

/// Dashboard summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSummary {
    pub total_quizzes: usize,
    /// Correct answers over questions asked across all quizzes, in percent.
    pub average_accuracy: u32,
    pub total_questions: u64,
    pub favorite_category: String,
    #[serde(flatten)]
    pub stats: Stats,
}

/// Accuracy for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryPerformance {
    pub category: String,
    pub quizzes: usize,
    pub total_questions: u64,
    pub correct: u64,
    pub accuracy: u32,
}

fn category_of(result: &QuizResult) -> &str {
    if result.category.is_empty() {
        "Mixed"
    } else {
        &result.category
    }
}

fn percent(part: u64, whole: u64) -> u32 {
    if whole == 0 {
        0
    } else {
        (part as f64 / whole as f64 * 100.0).round() as u32
    }
}

/// Summarize the history.
pub fn summarize(history: &[QuizResult], stats: Stats) -> StatsSummary {
    let total_questions: u64 = history.iter().map(|r| r.total_questions as u64).sum();
    let total_correct: u64 = history.iter().map(|r| r.score as u64).sum();

    StatsSummary {
        total_quizzes: history.len(),
        average_accuracy: percent(total_correct, total_questions),
        total_questions,
        favorite_category: favorite_category(history),
        stats,
    }
}

/// Most frequently played category. Ties go to the category that first
/// appeared later in the history; "None" for an empty history.
pub fn favorite_category(history: &[QuizResult]) -> String {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for result in history {
        let category = category_of(result);
        match counts.iter_mut().find(|(c, _)| *c == category) {
            Some((_, n)) => *n += 1,
            None => counts.push((category, 1)),
        }
    }

    counts
        .into_iter()
        .fold(None::<(&str, usize)>, |best, (category, n)| match best {
            Some((_, best_n)) if best_n > n => best,
            _ => Some((category, n)),
        })
        .map(|(category, _)| category.to_string())
        .unwrap_or_else(|| "None".to_string())
}

/// Per-category accuracy, in order of first appearance.
pub fn category_performance(history: &[QuizResult]) -> Vec<CategoryPerformance> {
    let mut rows: Vec<CategoryPerformance> = Vec::new();
    for result in history {
        let category = category_of(result);
        let idx = match rows.iter().position(|r| r.category == category) {
            Some(idx) => idx,
            None => {
                rows.push(CategoryPerformance {
                    category: category.to_string(),
                    quizzes: 0,
                    total_questions: 0,
                    correct: 0,
                    accuracy: 0,
                });
                rows.len() - 1
            }
        };
        let row = &mut rows[idx];
        row.quizzes += 1;
        row.total_questions += result.total_questions as u64;
        row.correct += result.score as u64;
    }

    for row in &mut rows {
        row.accuracy = percent(row.correct, row.total_questions);
    }
    rows
}

/// Accuracy of the `n` most recent quizzes, oldest first. History is stored
/// newest first.
pub fn recent_performance(history: &[QuizResult], n: usize) -> Vec<u32> {
    history.iter().take(n).rev().map(|r| r.accuracy).collect()
}
