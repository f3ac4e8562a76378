//! The `trivia export`, `import`, and `clear` commands.

use std::path::PathBuf;

use anyhow::{Context as _, Result};

use trivia_store::Snapshot;

use super::Context;

pub fn export(ctx: &Context, output: Option<PathBuf>) -> Result<()> {
    let store = ctx.store()?;
    let json = serde_json::to_string_pretty(&store.export()).context("failed to serialize data")?;

    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, json)
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("Exported data to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

pub fn import(ctx: &Context, input: PathBuf) -> Result<()> {
    let content = std::fs::read_to_string(&input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let snapshot: Snapshot = serde_json::from_str(&content)
        .with_context(|| format!("{} is not a trivia export", input.display()))?;

    let store = ctx.store()?;
    let written = store.import(&snapshot);
    println!("Imported {written} of {} entries.", snapshot.len());
    Ok(())
}

pub fn clear(ctx: &Context, yes: bool) -> Result<()> {
    anyhow::ensure!(yes, "this deletes all stored data; re-run with --yes to confirm");

    let store = ctx.store()?;
    store.clear_all();
    println!("All data cleared.");
    Ok(())
}
