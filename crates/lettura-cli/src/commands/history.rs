//! The `lettura history` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::Table;

use lettura_core::traits::ResultStore;
use lettura_store::JsonFileStore;

pub async fn execute(
    user: String,
    store_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = lettura_providers::config::load_config_from(config_path.as_deref())?;
    let store = JsonFileStore::new(store_path.unwrap_or(config.store_path));

    let history = store.history(&user).await?;
    if history.is_empty() {
        println!("No results for {user}.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Date", "Score", "Article"]);
    for record in &history {
        table.add_row(vec![
            record.date.to_string(),
            format!("{}/{}", record.score, record.scored_count),
            record.article_title.clone(),
        ]);
    }
    println!("{table}");

    let total: u32 = history.iter().map(|r| r.score).sum();
    let scored: u32 = history.iter().map(|r| r.scored_count).sum();
    if scored > 0 {
        println!(
            "{} quiz(zes), {:.1}% correct overall",
            history.len(),
            f64::from(total) * 100.0 / f64::from(scored)
        );
    }

    Ok(())
}
