//! The `trivia categories` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use trivia_providers::categories::CATEGORIES;

pub fn execute() -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec!["ID", "Category"]);
    for (id, name) in CATEGORIES {
        table.add_row(vec![Cell::new(id), Cell::new(name)]);
    }

    println!("{table}");
    println!("Use `trivia play --category <ID>`; omit it for mixed categories.");
    Ok(())
}
