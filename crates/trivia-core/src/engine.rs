//! Quiz engine: drives a [`QuizSession`] in real time.
//!
//! Fetches a batch from the injected [`QuestionBank`], runs a countdown for
//! each question, feeds ticks and player actions into the session, and
//! hands the finished quiz to the [`ResultLedger`]. Rendering happens in a
//! [`SessionObserver`]; the engine only emits data.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::countdown::{Countdown, Tick};
use crate::error::QuizError;
use crate::model::{QuestionQuery, QuizResult, Stats};
use crate::session::{
    PresentedQuestion, QuizSession, QuizSummary, Resolution, TickEffect, DEFAULT_TIME_LIMIT_SECS,
};
use crate::traits::{QuestionBank, ResultLedger};

/// Configuration for the quiz engine.
#[derive(Debug, Clone)]
pub struct QuizEngineConfig {
    /// Seconds per question.
    pub time_limit_secs: u32,
    /// Pause between a resolution and the next question.
    pub resolution_delay: Duration,
}

impl Default for QuizEngineConfig {
    fn default() -> Self {
        Self {
            time_limit_secs: DEFAULT_TIME_LIMIT_SECS,
            resolution_delay: Duration::from_secs(2),
        }
    }
}

/// What to play.
#[derive(Debug, Clone, Default)]
pub struct QuizRequest {
    pub query: QuestionQuery,
    /// Display name of the chosen category, recorded with the result.
    pub category_name: Option<String>,
}

impl QuizRequest {
    pub fn category_label(&self) -> String {
        self.category_name
            .clone()
            .or_else(|| self.query.normalized().category)
            .unwrap_or_else(|| "Mixed".to_string())
    }

    pub fn difficulty_label(&self) -> String {
        self.query
            .difficulty
            .map(|d| d.to_string())
            .unwrap_or_else(|| "mixed".to_string())
    }
}

/// Input from the player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerAction {
    /// Answer by text.
    Answer(String),
    /// Answer by zero-based position in the presented answers.
    Choose(usize),
    Skip,
    Quit,
}

/// A finished, persisted quiz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizReport {
    pub summary: QuizSummary,
    pub result: QuizResult,
    pub stats: Stats,
}

/// Display updates emitted while a quiz runs.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    QuestionPresented(PresentedQuestion),
    TimerTick { index: usize, remaining: u32 },
    Resolved(Resolution),
    Completed(QuizReport),
}

/// Subscriber for session events.
pub trait SessionObserver: Send + Sync {
    fn on_event(&self, event: &SessionEvent);
}

/// Observer that ignores everything.
pub struct NoopObserver;

impl SessionObserver for NoopObserver {
    fn on_event(&self, _: &SessionEvent) {}
}

/// The quiz engine.
pub struct QuizEngine {
    bank: Arc<dyn QuestionBank>,
    ledger: Arc<dyn ResultLedger>,
    config: QuizEngineConfig,
}

impl QuizEngine {
    pub fn new(
        bank: Arc<dyn QuestionBank>,
        ledger: Arc<dyn ResultLedger>,
        config: QuizEngineConfig,
    ) -> Self {
        Self {
            bank,
            ledger,
            config,
        }
    }

    /// Play one quiz to completion.
    ///
    /// Nothing is persisted unless every question is resolved: an empty
    /// batch fails with [`QuizError::NoQuestions`], and a `Quit` action or a
    /// closed action channel fails with [`QuizError::Abandoned`].
    pub async fn run(
        &self,
        request: &QuizRequest,
        actions: &mut mpsc::Receiver<PlayerAction>,
        observer: &dyn SessionObserver,
    ) -> Result<QuizReport, QuizError> {
        let questions = self.bank.questions(&request.query).await;
        if questions.is_empty() {
            tracing::error!("no questions available for {:?}", request.query);
            return Err(QuizError::NoQuestions);
        }
        tracing::info!(
            count = questions.len(),
            category = %request.category_label(),
            difficulty = %request.difficulty_label(),
            "starting quiz"
        );

        let mut session = QuizSession::new(questions, self.config.time_limit_secs);
        let mut presented = session.start()?;

        loop {
            observer.on_event(&SessionEvent::QuestionPresented(presented.clone()));

            let resolution = self
                .resolve_question(&mut session, presented.index, actions, observer)
                .await?;
            observer.on_event(&SessionEvent::Resolved(resolution));

            tokio::time::sleep(self.config.resolution_delay).await;
            match discard_pending(actions) {
                Some(0) => {}
                Some(discarded) => {
                    tracing::debug!(discarded, "ignored input received between questions");
                }
                None => {
                    return Err(QuizError::Abandoned {
                        question: presented.index + 1,
                        total: session.total_questions(),
                    });
                }
            }

            match session.advance()? {
                Some(next) => presented = next,
                None => break,
            }
        }

        let summary = session.summary();
        let result = self.ledger.add_quiz_result(
            summary.to_new_result(&request.category_label(), &request.difficulty_label()),
        );
        // The high score tracks points earned, not the raw score.
        let stats = self.ledger.save_stats(
            summary.points_earned,
            summary.points_earned,
            summary.max_streak,
        );

        tracing::info!(
            score = summary.score,
            total = summary.total_questions,
            points = summary.points_earned,
            "quiz complete"
        );

        let report = QuizReport {
            summary,
            result,
            stats,
        };
        observer.on_event(&SessionEvent::Completed(report.clone()));
        Ok(report)
    }

    async fn resolve_question(
        &self,
        session: &mut QuizSession,
        index: usize,
        actions: &mut mpsc::Receiver<PlayerAction>,
        observer: &dyn SessionObserver,
    ) -> Result<Resolution, QuizError> {
        let mut countdown = Countdown::start(index, self.config.time_limit_secs);

        let outcome = loop {
            tokio::select! {
                tick = countdown.next_tick() => {
                    // A countdown that ends without a zero tick (zero time
                    // limit) still times the question out.
                    let tick = tick.unwrap_or(Tick { question: index, remaining: 0 });
                    match session.tick(tick) {
                        TickEffect::Ignored => {}
                        TickEffect::Remaining(remaining) => {
                            observer.on_event(&SessionEvent::TimerTick { index, remaining });
                        }
                        TickEffect::TimedOut(resolution) => {
                            observer.on_event(&SessionEvent::TimerTick { index, remaining: 0 });
                            break Ok(resolution);
                        }
                    }
                }
                action = actions.recv() => {
                    let resolution = match action {
                        Some(PlayerAction::Answer(text)) => session.answer(&text),
                        Some(PlayerAction::Choose(position)) => session.choose(position),
                        Some(PlayerAction::Skip) => session.skip(),
                        Some(PlayerAction::Quit) | None => {
                            break Err(QuizError::Abandoned {
                                question: index + 1,
                                total: session.total_questions(),
                            });
                        }
                    };
                    match resolution {
                        Some(resolution) => break Ok(resolution),
                        None => tracing::debug!(index, "action did not resolve the question"),
                    }
                }
            }
        };

        countdown.cancel();
        outcome
    }
}

/// Drop answers queued during the resolution delay. Returns `None` if one
/// of them was a `Quit`.
fn discard_pending(actions: &mut mpsc::Receiver<PlayerAction>) -> Option<usize> {
    let mut discarded = 0;
    while let Ok(action) = actions.try_recv() {
        if action == PlayerAction::Quit {
            return None;
        }
        discarded += 1;
    }
    Some(discarded)
}
