//! The `trivia questions` command.

use anyhow::Result;
use clap::Subcommand;
use comfy_table::{Cell, Table};
use uuid::Uuid;

use trivia_core::model::{CustomQuestionUpdate, Difficulty, NewCustomQuestion};

use super::Context;

#[derive(Subcommand)]
pub enum QuestionsAction {
    /// List custom questions
    List,

    /// Add a custom question
    Add {
        #[arg(long)]
        question: String,

        #[arg(long)]
        correct: String,

        /// Wrong answer (give exactly three)
        #[arg(long = "wrong")]
        wrong: Vec<String>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        difficulty: Option<Difficulty>,
    },

    /// Edit fields of a custom question
    Edit {
        id: Uuid,

        #[arg(long)]
        question: Option<String>,

        #[arg(long)]
        correct: Option<String>,

        /// Replacement wrong answers (give exactly three, or none)
        #[arg(long = "wrong")]
        wrong: Vec<String>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        difficulty: Option<Difficulty>,
    },

    /// Delete a custom question
    Delete { id: Uuid },
}

fn three_wrong_answers(wrong: Vec<String>) -> Result<[String; 3]> {
    <[String; 3]>::try_from(wrong)
        .map_err(|given| anyhow::anyhow!("expected exactly 3 --wrong answers, got {}", given.len()))
}

pub fn execute(ctx: &Context, action: QuestionsAction) -> Result<()> {
    let store = ctx.store()?;

    match action {
        QuestionsAction::List => {
            let questions = store.custom_questions();
            if questions.is_empty() {
                println!("No custom questions. Add one with `trivia questions add`.");
                return Ok(());
            }

            let mut table = Table::new();
            table.set_header(vec!["ID", "Question", "Answer", "Category", "Difficulty"]);
            for q in &questions {
                let question = q.to_question();
                table.add_row(vec![
                    Cell::new(q.id),
                    Cell::new(&q.question),
                    Cell::new(&q.correct_answer),
                    Cell::new(question.category),
                    Cell::new(question.difficulty),
                ]);
            }
            println!("{table}");
        }
        QuestionsAction::Add {
            question,
            correct,
            wrong,
            category,
            difficulty,
        } => {
            let new = NewCustomQuestion {
                question,
                correct_answer: correct,
                wrong_answers: three_wrong_answers(wrong)?,
                category: category.filter(|c| !c.trim().is_empty()),
                difficulty,
            };
            let missing = new.missing_fields();
            anyhow::ensure!(
                missing.is_empty(),
                "please fill in all required fields: {}",
                missing.join(", ")
            );

            let stored = store.add_custom_question(new);
            println!("Added custom question {}", stored.id);
        }
        QuestionsAction::Edit {
            id,
            question,
            correct,
            wrong,
            category,
            difficulty,
        } => {
            let wrong_answers = if wrong.is_empty() {
                None
            } else {
                Some(three_wrong_answers(wrong)?)
            };
            let update = CustomQuestionUpdate {
                question,
                correct_answer: correct,
                wrong_answers,
                category,
                difficulty,
            };
            let updated = store
                .update_custom_question(id, update)
                .ok_or_else(|| anyhow::anyhow!("no custom question with id {id}"))?;
            println!("Updated custom question {}", updated.id);
        }
        QuestionsAction::Delete { id } => {
            anyhow::ensure!(
                store.delete_custom_question(id),
                "no custom question with id {id}"
            );
            println!("Deleted custom question {id}");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrong_answers_must_be_three() {
        let ok = three_wrong_answers(vec!["a".into(), "b".into(), "c".into()]).unwrap();
        assert_eq!(ok, ["a", "b", "c"]);

        let err = three_wrong_answers(vec!["a".into()]).unwrap_err();
        assert!(err.to_string().contains("got 1"));
    }
}
