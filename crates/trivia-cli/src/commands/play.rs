//! The `trivia play` command.

use std::io::BufRead;
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;

use trivia_core::engine::{PlayerAction, QuizEngine, QuizRequest, SessionEvent, SessionObserver};
use trivia_core::error::QuizError;
use trivia_core::model::{Difficulty, QuestionQuery, UserProfile};
use trivia_core::session::{Outcome, QuizSummary, POINTS_PER_CORRECT};
use trivia_providers::categories::category_name;
use trivia_providers::config::create_fetcher;
use trivia_store::Namespace;

use super::{open_store, Context};

/// Largest batch the question API serves.
const MAX_AMOUNT: u32 = 50;

/// Prints session events to the terminal.
struct ConsoleObserver;

impl SessionObserver for ConsoleObserver {
    fn on_event(&self, event: &SessionEvent) {
        match event {
            SessionEvent::QuestionPresented(q) => {
                println!();
                println!(
                    "Question {}/{} ({:.0}%) · {} · {}",
                    q.index + 1,
                    q.total,
                    q.progress_percent(),
                    q.category,
                    q.difficulty
                );
                println!("{}", q.prompt);
                for (i, answer) in q.answers.iter().enumerate() {
                    println!("  {}. {answer}", i + 1);
                }
                println!(
                    "[{}s] Enter 1-{}, s to skip, q to quit",
                    q.time_limit_secs,
                    q.answers.len()
                );
            }
            SessionEvent::TimerTick { remaining, .. } => {
                if matches!(remaining, 10 | 5) {
                    println!("⏱️  {remaining}s left");
                }
            }
            SessionEvent::Resolved(r) => match &r.outcome {
                Outcome::Correct { elapsed_secs } => {
                    println!(
                        "✅ Correct! +{POINTS_PER_CORRECT} (streak {}, {elapsed_secs:.1}s)",
                        r.streak
                    );
                }
                Outcome::Incorrect { .. } => println!("❌ Wrong! Correct: {}", r.correct_answer),
                Outcome::TimedOut => {
                    println!("⏰ Time's up! Correct answer: {}", r.correct_answer)
                }
                Outcome::Skipped => println!("⏭️ Skipped! Answer: {}", r.correct_answer),
            },
            SessionEvent::Completed(report) => {
                print_summary(&report.summary);
                println!(
                    "High score: {} · Total points: {} · Best streak: {}",
                    report.stats.high_score, report.stats.total_points, report.stats.max_streak
                );
            }
        }
    }
}

fn print_summary(summary: &QuizSummary) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["Score", "Accuracy", "Avg Time", "Max Streak", "Points"]);
    table.add_row(vec![
        Cell::new(format!("{}/{}", summary.score, summary.total_questions)),
        Cell::new(format!("{}%", summary.accuracy)),
        Cell::new(format!("{:.1}s", summary.avg_time_secs)),
        Cell::new(summary.max_streak),
        Cell::new(summary.points_earned),
    ]);

    println!("\nQuiz Complete! {}", summary.title());
    println!("{table}");
}

/// Map a line of input to an action. Blank lines map to nothing.
fn parse_action(line: &str) -> Option<PlayerAction> {
    let input = line.trim();
    match input.to_lowercase().as_str() {
        "" => None,
        "s" | "skip" => Some(PlayerAction::Skip),
        "q" | "quit" => Some(PlayerAction::Quit),
        lowered => match lowered.parse::<usize>() {
            Ok(n) if n >= 1 => Some(PlayerAction::Choose(n - 1)),
            _ => Some(PlayerAction::Answer(input.to_string())),
        },
    }
}

/// Forward stdin lines as actions on a plain thread so a pending read
/// never holds up process exit. The channel closes at end of input.
fn spawn_input_reader(tx: mpsc::Sender<PlayerAction>) {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if let Some(action) = parse_action(&line) {
                if tx.blocking_send(action).is_err() {
                    break;
                }
            }
        }
    });
}

pub async fn execute(
    ctx: &Context,
    category: Option<String>,
    difficulty: Option<Difficulty>,
    amount: Option<u32>,
) -> Result<()> {
    let config = ctx.config()?;
    let store = Arc::new(open_store(&config));

    // Profile preferences only apply once a profile has been saved.
    let preferences = store
        .get::<UserProfile>(Namespace::UserProfile)
        .map(|p| p.preferences);

    let category = category
        .or_else(|| preferences.as_ref().and_then(|p| p.default_category.clone()))
        .filter(|c| !c.trim().is_empty());
    let difficulty = difficulty.or(preferences.as_ref().and_then(|p| p.default_difficulty));
    let amount = amount
        .or(preferences.as_ref().map(|p| p.default_questions))
        .unwrap_or(config.default_amount);

    anyhow::ensure!(
        (1..=MAX_AMOUNT).contains(&amount),
        "amount must be between 1 and {MAX_AMOUNT}"
    );

    let category_label = match &category {
        Some(id) => Some(
            category_name(id)
                .ok_or_else(|| {
                    anyhow::anyhow!("unknown category '{id}'. Run `trivia categories` to list them")
                })?
                .to_string(),
        ),
        None => None,
    };

    let request = QuizRequest {
        query: QuestionQuery {
            category,
            difficulty,
            amount,
        },
        category_name: category_label,
    };

    let fetcher = Arc::new(create_fetcher(&config, store.clone()));
    let engine = QuizEngine::new(fetcher, store.clone(), config.engine_config());

    let (tx, mut rx) = mpsc::channel(16);
    spawn_input_reader(tx);

    eprintln!(
        "Starting quiz: {} question(s), {} · {}",
        amount,
        request.category_label(),
        request.difficulty_label()
    );

    match engine.run(&request, &mut rx, &ConsoleObserver).await {
        Ok(_) => Ok(()),
        Err(e @ QuizError::Abandoned { .. }) => {
            println!("\nQuiz abandoned ({e}). Nothing was saved.");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
