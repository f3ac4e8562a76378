//! The `trivia stats` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use trivia_core::statistics::{category_performance, recent_performance, summarize};

use super::Context;

const RECENT_QUIZZES: usize = 10;

pub fn execute(ctx: &Context, json: bool) -> Result<()> {
    let store = ctx.store()?;
    let history = store.quiz_history();
    let summary = summarize(&history, store.stats());

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("Quizzes played:     {}", summary.total_quizzes);
    println!("Questions answered: {}", summary.total_questions);
    println!("Average accuracy:   {}%", summary.average_accuracy);
    println!("Favorite category:  {}", summary.favorite_category);
    println!("High score:         {}", summary.stats.high_score);
    println!("Total points:       {}", summary.stats.total_points);
    println!("Best streak:        {}", summary.stats.max_streak);

    let categories = category_performance(&history);
    if !categories.is_empty() {
        let mut table = Table::new();
        table.set_header(vec!["Category", "Quizzes", "Correct", "Accuracy"]);
        for perf in &categories {
            table.add_row(vec![
                Cell::new(&perf.category),
                Cell::new(perf.quizzes),
                Cell::new(format!("{}/{}", perf.correct, perf.total_questions)),
                Cell::new(format!("{}%", perf.accuracy)),
            ]);
        }
        println!("\n{table}");

        let recent: Vec<String> = recent_performance(&history, RECENT_QUIZZES)
            .iter()
            .map(|a| format!("{a}%"))
            .collect();
        println!("Recent accuracy (oldest first): {}", recent.join(" "));
    }

    Ok(())
}
