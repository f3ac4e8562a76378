//! Quiz session state machine.
//!
//! A session moves `Idle -> Active(0) -> Resolved(0) -> Active(1) -> ... -> Complete`.
//! Each question is resolved exactly once, by an answer, a skip, or the
//! countdown reaching zero; whichever arrives first wins and the rest are
//! ignored. The session does no I/O and owns no timer: the
//! [`QuizEngine`](crate::engine::QuizEngine) feeds it ticks and player input.

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use crate::countdown::Tick;
use crate::error::QuizError;
use crate::model::{Difficulty, NewQuizResult, Question};
use crate::text::decode_html_entities;

/// Seconds allowed per question.
pub const DEFAULT_TIME_LIMIT_SECS: u32 = 30;

/// Points per correct answer.
pub const POINTS_PER_CORRECT: u64 = 100;

/// Bonus points per question in the best streak.
pub const POINTS_PER_STREAK: u64 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Active(usize),
    Resolved(usize),
    Complete,
}

/// A question as shown to the player: decoded text, answers shuffled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresentedQuestion {
    /// Zero-based position in the quiz.
    pub index: usize,
    pub total: usize,
    pub prompt: String,
    pub answers: Vec<String>,
    pub category: String,
    pub difficulty: Difficulty,
    pub time_limit_secs: u32,
}

impl PresentedQuestion {
    /// Fraction of the quiz reached once this question is shown, in percent.
    pub fn progress_percent(&self) -> f64 {
        (self.index + 1) as f64 / self.total as f64 * 100.0
    }
}

/// How a question was resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    Correct { elapsed_secs: f64 },
    Incorrect { selected: String, elapsed_secs: f64 },
    Skipped,
    TimedOut,
}

impl Outcome {
    pub fn is_correct(&self) -> bool {
        matches!(self, Outcome::Correct { .. })
    }
}

/// The effect of resolving a question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub index: usize,
    pub outcome: Outcome,
    /// Decoded correct answer.
    pub correct_answer: String,
    pub score: u32,
    pub streak: u32,
}

/// What a countdown tick did to the session.
#[derive(Debug, Clone, PartialEq)]
pub enum TickEffect {
    /// The tick belonged to another question or arrived after resolution.
    Ignored,
    Remaining(u32),
    TimedOut(Resolution),
}

/// End-of-quiz figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizSummary {
    pub score: u32,
    pub total_questions: u32,
    pub correct_count: u32,
    pub max_streak: u32,
    /// `round(correct / total * 100)`.
    pub accuracy: u32,
    /// Sum of recorded answer times divided by the total question count.
    /// Skipped and timed-out questions record no time but still count in
    /// the denominator.
    pub avg_time_secs: f64,
    pub points_earned: u64,
}

impl QuizSummary {
    /// Heading shown with the result.
    pub fn title(&self) -> &'static str {
        if self.accuracy >= 80 {
            "Outstanding!"
        } else if self.accuracy >= 60 {
            "Well Done!"
        } else {
            "Keep Learning!"
        }
    }

    pub fn to_new_result(&self, category: &str, difficulty: &str) -> NewQuizResult {
        NewQuizResult {
            score: self.score,
            total_questions: self.total_questions,
            accuracy: self.accuracy,
            avg_time_secs: (self.avg_time_secs * 10.0).round() / 10.0,
            points: self.points_earned,
            category: category.to_string(),
            difficulty: difficulty.to_string(),
        }
    }
}

/// The state of one quiz in progress.
#[derive(Debug)]
pub struct QuizSession {
    questions: Vec<Question>,
    time_limit_secs: u32,
    phase: Phase,
    current_index: usize,
    score: u32,
    correct_count: u32,
    streak: u32,
    max_streak: u32,
    question_times: Vec<f64>,
    is_answered: bool,
    time_remaining: u32,
    presented_at: Option<Instant>,
    current: Option<PresentedQuestion>,
    correct_answer: String,
}

impl QuizSession {
    pub fn new(questions: Vec<Question>, time_limit_secs: u32) -> Self {
        Self {
            questions,
            time_limit_secs,
            phase: Phase::Idle,
            current_index: 0,
            score: 0,
            correct_count: 0,
            streak: 0,
            max_streak: 0,
            question_times: Vec::new(),
            is_answered: false,
            time_remaining: time_limit_secs,
            presented_at: None,
            current: None,
            correct_answer: String::new(),
        }
    }

    /// Present the first question.
    pub fn start(&mut self) -> Result<PresentedQuestion, QuizError> {
        if self.phase != Phase::Idle {
            return Err(QuizError::InvalidTransition("start called twice"));
        }
        if self.questions.is_empty() {
            return Err(QuizError::NoQuestions);
        }
        Ok(self.present(0))
    }

    /// Leave a resolved question. Returns the next question, or `None` once
    /// the quiz is complete.
    pub fn advance(&mut self) -> Result<Option<PresentedQuestion>, QuizError> {
        let Phase::Resolved(index) = self.phase else {
            return Err(QuizError::InvalidTransition(
                "advance before the question was resolved",
            ));
        };

        let next = index + 1;
        if next < self.questions.len() {
            Ok(Some(self.present(next)))
        } else {
            self.phase = Phase::Complete;
            self.current = None;
            self.presented_at = None;
            Ok(None)
        }
    }

    fn present(&mut self, index: usize) -> PresentedQuestion {
        let question = &self.questions[index];
        let correct = decode_html_entities(&question.correct_answer);

        let mut answers: Vec<String> = question
            .incorrect_answers
            .iter()
            .map(|a| decode_html_entities(a))
            .collect();
        answers.push(correct.clone());
        answers.shuffle(&mut rand::thread_rng());

        let presented = PresentedQuestion {
            index,
            total: self.questions.len(),
            prompt: decode_html_entities(&question.prompt),
            answers,
            category: decode_html_entities(&question.category),
            difficulty: question.difficulty,
            time_limit_secs: self.time_limit_secs,
        };

        self.current_index = index;
        self.phase = Phase::Active(index);
        self.is_answered = false;
        self.time_remaining = self.time_limit_secs;
        self.presented_at = Some(Instant::now());
        self.correct_answer = correct;
        self.current = Some(presented.clone());

        tracing::debug!(index, total = presented.total, "question presented");
        presented
    }

    /// Submit an answer by its text. Ignored once the question is resolved.
    pub fn answer(&mut self, selected: &str) -> Option<Resolution> {
        if !self.accepts_resolution() {
            return None;
        }
        self.is_answered = true;

        let elapsed_secs = self
            .presented_at
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or_default();
        self.question_times.push(elapsed_secs);

        let outcome = if selected == self.correct_answer {
            self.score += 1;
            self.correct_count += 1;
            self.streak += 1;
            self.max_streak = self.max_streak.max(self.streak);
            Outcome::Correct { elapsed_secs }
        } else {
            self.streak = 0;
            Outcome::Incorrect {
                selected: selected.to_string(),
                elapsed_secs,
            }
        };

        Some(self.resolve(outcome))
    }

    /// Submit an answer by its position in [`PresentedQuestion::answers`].
    /// Out-of-range positions are ignored and do not resolve the question.
    pub fn choose(&mut self, position: usize) -> Option<Resolution> {
        let selected = self.current.as_ref()?.answers.get(position)?.clone();
        self.answer(&selected)
    }

    pub fn skip(&mut self) -> Option<Resolution> {
        if !self.accepts_resolution() {
            return None;
        }
        self.is_answered = true;
        self.streak = 0;
        Some(self.resolve(Outcome::Skipped))
    }

    /// Apply a countdown tick. Ticks for other questions are ignored so a
    /// stale countdown can never time out a fresh question.
    pub fn tick(&mut self, tick: Tick) -> TickEffect {
        if tick.question != self.current_index || !self.accepts_resolution() {
            return TickEffect::Ignored;
        }

        self.time_remaining = tick.remaining;
        if tick.remaining > 0 {
            return TickEffect::Remaining(tick.remaining);
        }

        self.is_answered = true;
        self.streak = 0;
        TickEffect::TimedOut(self.resolve(Outcome::TimedOut))
    }

    fn accepts_resolution(&self) -> bool {
        matches!(self.phase, Phase::Active(_)) && !self.is_answered
    }

    fn resolve(&mut self, outcome: Outcome) -> Resolution {
        self.phase = Phase::Resolved(self.current_index);
        Resolution {
            index: self.current_index,
            outcome,
            correct_answer: self.correct_answer.clone(),
            score: self.score,
            streak: self.streak,
        }
    }

    pub fn summary(&self) -> QuizSummary {
        let total = self.questions.len() as u32;
        let (accuracy, avg_time_secs) = if total == 0 {
            (0, 0.0)
        } else {
            (
                (self.correct_count as f64 / total as f64 * 100.0).round() as u32,
                self.question_times.iter().sum::<f64>() / total as f64,
            )
        };

        QuizSummary {
            score: self.score,
            total_questions: total,
            correct_count: self.correct_count,
            max_streak: self.max_streak,
            accuracy,
            avg_time_secs,
            points_earned: self.score as u64 * POINTS_PER_CORRECT
                + self.max_streak as u64 * POINTS_PER_STREAK,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current_question(&self) -> Option<&PresentedQuestion> {
        self.current.as_ref()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    pub fn is_answered(&self) -> bool {
        self.is_answered
    }

    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn max_streak(&self) -> u32 {
        self.max_streak
    }

    pub fn question_times(&self) -> &[f64] {
        &self.question_times
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn question(prompt: &str, correct: &str) -> Question {
        Question {
            prompt: prompt.into(),
            correct_answer: correct.into(),
            incorrect_answers: vec!["w1".into(), "w2".into(), "w3".into()],
            category: "General".into(),
            difficulty: Difficulty::Easy,
        }
    }

    fn three_questions() -> Vec<Question> {
        vec![
            question("Q1", "A1"),
            question("Q2", "A2"),
            question("Q3", "A3"),
        ]
    }

    #[tokio::test(start_paused = true)]
    async fn start_presents_first_question() {
        let mut session = QuizSession::new(three_questions(), 30);
        assert_eq!(session.phase(), Phase::Idle);

        let presented = session.start().unwrap();
        assert_eq!(presented.index, 0);
        assert_eq!(presented.total, 3);
        assert_eq!(presented.answers.len(), 4);
        assert!(presented.answers.contains(&"A1".to_string()));
        assert_eq!(session.phase(), Phase::Active(0));
        assert!(!session.is_answered());
        assert_eq!(session.time_remaining(), 30);
    }

    #[test]
    fn start_without_questions_fails() {
        let mut session = QuizSession::new(vec![], 30);
        assert!(matches!(session.start(), Err(QuizError::NoQuestions)));
        assert_eq!(session.phase(), Phase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn only_first_resolution_counts() {
        let mut session = QuizSession::new(three_questions(), 30);
        session.start().unwrap();

        let first = session.answer("A1").unwrap();
        assert!(first.outcome.is_correct());
        assert!(session.is_answered());

        assert!(session.answer("A1").is_none());
        assert!(session.skip().is_none());
        assert_eq!(
            session.tick(Tick {
                question: 0,
                remaining: 0
            }),
            TickEffect::Ignored
        );
        assert_eq!(session.score(), 1);
        assert_eq!(session.streak(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn answer_records_elapsed_time() {
        let mut session = QuizSession::new(three_questions(), 30);
        session.start().unwrap();
        tokio::time::advance(Duration::from_millis(4500)).await;

        let resolution = session.answer("w1").unwrap();
        assert_eq!(
            resolution.outcome,
            Outcome::Incorrect {
                selected: "w1".into(),
                elapsed_secs: 4.5
            }
        );
        assert_eq!(session.question_times(), &[4.5]);
    }

    #[tokio::test(start_paused = true)]
    async fn skip_and_timeout_reset_streak_without_timing() {
        let mut session = QuizSession::new(three_questions(), 30);
        session.start().unwrap();
        session.answer("A1").unwrap();
        session.advance().unwrap();

        let skipped = session.skip().unwrap();
        assert_eq!(skipped.outcome, Outcome::Skipped);
        assert_eq!(skipped.correct_answer, "A2");
        assert_eq!(session.streak(), 0);
        session.advance().unwrap();

        assert_eq!(
            session.tick(Tick {
                question: 2,
                remaining: 1
            }),
            TickEffect::Remaining(1)
        );
        let effect = session.tick(Tick {
            question: 2,
            remaining: 0,
        });
        assert!(matches!(
            effect,
            TickEffect::TimedOut(Resolution {
                outcome: Outcome::TimedOut,
                ..
            })
        ));
        assert_eq!(session.question_times().len(), 1);
        assert_eq!(session.max_streak(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_ticks_are_ignored() {
        let mut session = QuizSession::new(three_questions(), 30);
        session.start().unwrap();
        session.skip().unwrap();
        session.advance().unwrap();

        let effect = session.tick(Tick {
            question: 0,
            remaining: 0,
        });
        assert_eq!(effect, TickEffect::Ignored);
        assert!(!session.is_answered());
        assert_eq!(session.time_remaining(), 30);
    }

    #[tokio::test(start_paused = true)]
    async fn choose_out_of_range_does_not_resolve() {
        let mut session = QuizSession::new(three_questions(), 30);
        session.start().unwrap();
        assert!(session.choose(7).is_none());
        assert!(!session.is_answered());

        let position = session
            .current_question()
            .unwrap()
            .answers
            .iter()
            .position(|a| a == "A1")
            .unwrap();
        assert!(session.choose(position).unwrap().outcome.is_correct());
    }

    #[tokio::test(start_paused = true)]
    async fn advance_requires_resolution() {
        let mut session = QuizSession::new(three_questions(), 30);
        session.start().unwrap();
        assert!(matches!(
            session.advance(),
            Err(QuizError::InvalidTransition(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn decodes_entities_before_comparing() {
        let mut session = QuizSession::new(
            vec![question("Who wrote &quot;Hamlet&quot;?", "Shakespeare &amp; co")],
            30,
        );
        let presented = session.start().unwrap();
        assert_eq!(presented.prompt, "Who wrote \"Hamlet\"?");
        assert!(session.answer("Shakespeare & co").unwrap().outcome.is_correct());
    }

    #[tokio::test(start_paused = true)]
    async fn summary_matches_scoring_rules() {
        let mut session = QuizSession::new(three_questions(), 30);
        session.start().unwrap();
        tokio::time::advance(Duration::from_secs(3)).await;
        session.answer("A1").unwrap();
        session.advance().unwrap();
        session.tick(Tick {
            question: 1,
            remaining: 0,
        });
        session.advance().unwrap();
        tokio::time::advance(Duration::from_secs(6)).await;
        session.answer("A3").unwrap();
        assert_eq!(session.advance().unwrap(), None);
        assert_eq!(session.phase(), Phase::Complete);

        let summary = session.summary();
        assert_eq!(summary.score, 2);
        assert_eq!(summary.max_streak, 1);
        assert_eq!(summary.accuracy, 67);
        assert_eq!(summary.points_earned, 250);
        assert!((summary.avg_time_secs - 3.0).abs() < 1e-9);
        assert_eq!(summary.title(), "Well Done!");
    }

    #[test]
    fn new_result_rounds_average_time() {
        let summary = QuizSummary {
            score: 1,
            total_questions: 3,
            correct_count: 1,
            max_streak: 1,
            accuracy: 33,
            avg_time_secs: 4.26,
            points_earned: 150,
        };
        let result = summary.to_new_result("Mixed", "mixed");
        assert_eq!(result.avg_time_secs, 4.3);
        assert_eq!(result.points, 150);
        assert_eq!(summary.title(), "Keep Learning!");
    }
}
