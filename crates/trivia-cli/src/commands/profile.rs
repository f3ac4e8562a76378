//! The `trivia profile` command.

use anyhow::Result;

use trivia_core::model::{Difficulty, ProfileUpdate};
use trivia_providers::categories::category_name;

use super::Context;

pub fn execute(
    ctx: &Context,
    name: Option<String>,
    avatar: Option<String>,
    default_category: Option<String>,
    default_difficulty: Option<Difficulty>,
    default_questions: Option<u32>,
) -> Result<()> {
    let store = ctx.store()?;
    let mut profile = store.user_profile();

    let prefs_changed =
        default_category.is_some() || default_difficulty.is_some() || default_questions.is_some();

    if name.is_some() || avatar.is_some() || prefs_changed {
        if let Some(name) = &name {
            anyhow::ensure!(!name.trim().is_empty(), "name cannot be empty");
        }

        let preferences = if prefs_changed {
            let mut prefs = profile.preferences.clone();
            if let Some(category) = default_category {
                let category = category.trim().to_string();
                if category.is_empty() {
                    prefs.default_category = None;
                } else {
                    anyhow::ensure!(
                        category_name(&category).is_some(),
                        "unknown category '{category}'. Run `trivia categories` to list them"
                    );
                    prefs.default_category = Some(category);
                }
            }
            if let Some(difficulty) = default_difficulty {
                prefs.default_difficulty = Some(difficulty);
            }
            if let Some(n) = default_questions {
                anyhow::ensure!((1..=50).contains(&n), "default questions must be between 1 and 50");
                prefs.default_questions = n;
            }
            Some(prefs)
        } else {
            None
        };

        profile = store.update_user_profile(ProfileUpdate {
            name,
            avatar,
            preferences,
        });
        println!("Profile updated.");
    }

    let prefs = &profile.preferences;
    println!("{} {}", profile.avatar, profile.name);
    println!(
        "  Default category:   {}",
        prefs
            .default_category
            .as_deref()
            .map(|id| category_name(id).unwrap_or(id))
            .unwrap_or("Any")
    );
    println!(
        "  Default difficulty: {}",
        prefs
            .default_difficulty
            .map(|d| d.to_string())
            .unwrap_or_else(|| "any".to_string())
    );
    println!("  Default questions:  {}", prefs.default_questions);
    Ok(())
}
