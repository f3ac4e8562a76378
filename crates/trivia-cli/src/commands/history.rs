//! The `trivia history` command.

use anyhow::Result;
use comfy_table::{Cell, Table};
use uuid::Uuid;

use super::Context;

pub fn execute(ctx: &Context, limit: usize, delete: Option<Uuid>) -> Result<()> {
    let store = ctx.store()?;

    if let Some(id) = delete {
        anyhow::ensure!(store.delete_quiz_result(id), "no quiz result with id {id}");
        println!("Deleted quiz result {id}");
        return Ok(());
    }

    let history = store.quiz_history();
    if history.is_empty() {
        println!("No quizzes played yet. Run `trivia play` to start one.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec![
        "Date",
        "Category",
        "Difficulty",
        "Score",
        "Accuracy",
        "Avg Time",
        "Points",
        "ID",
    ]);

    for result in history.iter().take(limit) {
        table.add_row(vec![
            Cell::new(result.date.format("%Y-%m-%d %H:%M")),
            Cell::new(&result.category),
            Cell::new(&result.difficulty),
            Cell::new(format!("{}/{}", result.score, result.total_questions)),
            Cell::new(format!("{}%", result.accuracy)),
            Cell::new(format!("{:.1}s", result.avg_time_secs)),
            Cell::new(result.points),
            Cell::new(result.id),
        ]);
    }

    println!("{table}");
    if history.len() > limit {
        println!("Showing {limit} of {} results.", history.len());
    }
    Ok(())
}
