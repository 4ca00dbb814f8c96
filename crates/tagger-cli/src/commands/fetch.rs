use anyhow::{Context, Result};
use std::path::PathBuf;

use tagger_core::ItemRepository;
use tagger_infrastructure::{ConfigService, JsonItemRepository};
use tagger_interaction::ZoteroClient;
use tagger_interaction::zotero_client::items_with_abstracts;

pub async fn run(config_service: &ConfigService, output: Option<PathBuf>) -> Result<()> {
    let config = config_service
        .load()
        .context("Failed to load configuration")?;
    let output = output.unwrap_or(config.paths.items_input);

    // Placeholder credentials stop here, before any request is made
    let client = ZoteroClient::from_config(&config.zotero)?;

    println!("📚 Fetching items from Zotero...");
    let fetched = client
        .fetch_top_items()
        .await
        .context("Failed to fetch Zotero items")?;
    let fetched_count = fetched.len();

    let items = items_with_abstracts(fetched);
    JsonItemRepository::single_file(&output)
        .save_all(&items)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "✅ Saved {} items with abstracts to {}",
        items.len(),
        output.display()
    );
    if fetched_count > items.len() {
        println!(
            "  ({} items without an abstract were skipped)",
            fetched_count - items.len()
        );
    }

    Ok(())
}
