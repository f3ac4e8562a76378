//! The `trivia init` command.

use anyhow::{Context as _, Result};

use super::{open_store, Context};

pub fn execute(ctx: &Context, with_samples: bool) -> Result<()> {
    if std::path::Path::new("trivia.toml").exists() {
        println!("trivia.toml already exists, skipping.");
    } else {
        std::fs::write("trivia.toml", SAMPLE_CONFIG).context("failed to write trivia.toml")?;
        println!("Created trivia.toml");
    }

    let config = ctx.config()?;
    std::fs::create_dir_all(&config.data_dir)
        .with_context(|| format!("failed to create {}", config.data_dir.display()))?;
    println!("Data directory: {}", config.data_dir.display());

    if with_samples {
        let store = open_store(&config);
        match store.seed_sample_history() {
            0 => println!("History is not empty, skipping sample results."),
            n => println!("Added {n} sample quiz results"),
        }
    }

    println!("\nNext steps:");
    println!("  1. Run: trivia categories");
    println!("  2. Run: trivia play --amount 5");
    println!("  3. Run: trivia stats");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# trivia configuration

api_base_url = "https://opentdb.com"
request_timeout_secs = 10
cache_ttl_secs = 300

question_time_limit_secs = 30
resolution_delay_ms = 2000
default_amount = 5

data_dir = "./trivia-data"
"#;
