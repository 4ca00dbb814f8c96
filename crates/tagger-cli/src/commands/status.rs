use anyhow::{Context, Result};
use colored::Colorize;
use std::collections::HashMap;
use std::path::PathBuf;

use tagger_core::{Item, ItemRepository, REVIEWED_TAG};
use tagger_infrastructure::{ConfigService, JsonItemRepository};

/// Review counts for one item file.
#[derive(Debug, PartialEq, Eq)]
pub struct StatusReport {
    pub total: usize,
    pub reviewed: usize,
    /// (tag, count), most frequent first, ties by name.
    pub tag_counts: Vec<(String, usize)>,
}

impl StatusReport {
    pub fn from_items(items: &[Item]) -> Self {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for tags in items.iter().filter_map(|item| item.assigned_tags.as_ref()) {
            for tag in tags.iter().filter(|tag| tag.as_str() != REVIEWED_TAG) {
                *counts.entry(tag.as_str()).or_default() += 1;
            }
        }

        let mut tag_counts: Vec<(String, usize)> = counts
            .into_iter()
            .map(|(tag, count)| (tag.to_string(), count))
            .collect();
        tag_counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        Self {
            total: items.len(),
            reviewed: items.iter().filter(|item| item.is_reviewed()).count(),
            tag_counts,
        }
    }
}

pub fn run(config_service: &ConfigService, file: Option<PathBuf>) -> Result<()> {
    let config = config_service
        .load()
        .context("Failed to load configuration")?;
    let path = file.unwrap_or(config.paths.items_output);

    if !path.exists() {
        println!("No tagged items yet ({} does not exist).", path.display());
        return Ok(());
    }

    let items = JsonItemRepository::single_file(&path)
        .load_all()
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let report = StatusReport::from_items(&items);

    println!("📊 {}", path.display());
    println!(
        "  {} of {} items reviewed ({} remaining)",
        report.reviewed.to_string().bold(),
        report.total,
        report.total - report.reviewed
    );

    if report.tag_counts.is_empty() {
        println!("  No tags assigned yet.");
        return Ok(());
    }

    let width = report
        .tag_counts
        .iter()
        .map(|(tag, _)| tag.chars().count())
        .max()
        .unwrap_or(0);
    println!();
    for (tag, count) in &report.tag_counts {
        println!("  {:<width$}  {:>5}", tag, count, width = width);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// An empty tag list means the item was never committed.
    fn tagged(key: &str, tags: &[&str]) -> Item {
        let mut item = Item::new(key, "t", "abstract");
        if !tags.is_empty() {
            item.assigned_tags = Some(tags.iter().map(|t| t.to_string()).collect());
        }
        item
    }

    #[test]
    fn test_report_counts_reviewed_and_tags() {
        let items = vec![
            tagged("1", &["Wetland", "Survey", "reviewed"]),
            tagged("2", &["reviewed"]),
            tagged("3", &[]),
            tagged("4", &["Survey", "reviewed"]),
        ];

        let report = StatusReport::from_items(&items);
        assert_eq!(report.total, 4);
        assert_eq!(report.reviewed, 3);
        assert_eq!(
            report.tag_counts,
            vec![("Survey".to_string(), 2), ("Wetland".to_string(), 1)]
        );
    }

    #[test]
    fn test_ties_sorted_by_name() {
        let items = vec![
            tagged("1", &["Forest", "reviewed"]),
            tagged("2", &["Bog", "reviewed"]),
        ];
        let names: Vec<_> = StatusReport::from_items(&items)
            .tag_counts
            .into_iter()
            .map(|(tag, _)| tag)
            .collect();
        assert_eq!(names, vec!["Bog", "Forest"]);
    }

    #[test]
    fn test_run_reads_output_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let items_path = temp_dir.path().join("tagged.json");
        JsonItemRepository::single_file(&items_path)
            .save_all(&[tagged("1", &["A", "reviewed"])])
            .unwrap();

        let service = ConfigService::with_path(temp_dir.path().join("config.toml"));
        run(&service, Some(items_path)).unwrap();
        run(&service, Some(temp_dir.path().join("missing.json"))).unwrap();
    }
}
