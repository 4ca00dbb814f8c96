//! JSON file ItemRepository implementation.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tagger_core::item::{Item, ItemRepository};
use tagger_core::{Result, TaggerError};

use crate::storage::AtomicJsonFile;

/// Item repository backed by two JSON files.
///
/// Responsibilities:
/// - Read the item sequence from the input file, in input order
/// - When resuming, carry saved `assigned_tags` over from the output file by
///   item key
/// - Rewrite the whole sequence to the output file atomically
///
/// Does NOT:
/// - Ever write to the input file
/// - Validate tags against the taxonomy (the review session does that)
pub struct JsonItemRepository {
    input: AtomicJsonFile<Vec<Item>>,
    output: AtomicJsonFile<Vec<Item>>,
    resume: bool,
}

impl JsonItemRepository {
    /// Creates a repository reading `input` and writing `output`.
    ///
    /// With `resume` set, `load_all` restores earlier selections from
    /// `output` when it holds any items.
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>, resume: bool) -> Self {
        Self {
            input: AtomicJsonFile::new(input),
            output: AtomicJsonFile::new(output),
            resume,
        }
    }

    /// A repository that reads and writes the same file.
    ///
    /// Used by `tagger fetch` and `tagger status` on a single item file.
    pub fn single_file(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self::new(path.clone(), path, false)
    }

    pub fn input_path(&self) -> &Path {
        self.input.path()
    }

    pub fn output_path(&self) -> &Path {
        self.output.path()
    }

    /// Items previously written to the output file, if resuming and the file
    /// holds anything.
    fn saved_items(&self) -> Result<Option<Vec<Item>>> {
        if !self.resume || self.input.path() == self.output.path() {
            return Ok(None);
        }
        Ok(self.output.load()?)
    }
}

/// Copies `assigned_tags` from `saved` onto the matching `items` by key.
///
/// Saved records whose key is no longer in the input but that carry
/// assigned tags are appended at the end so their review is not lost on
/// the next save. Returns how many items got saved tags back.
fn merge_saved(items: &mut Vec<Item>, saved: Vec<Item>) -> usize {
    let positions: HashMap<String, usize> = items
        .iter()
        .enumerate()
        .map(|(i, item)| (item.key.clone(), i))
        .collect();

    let mut restored = 0;
    let mut orphans = Vec::new();
    for record in saved {
        let Some(tags) = record.assigned_tags.clone() else {
            continue;
        };
        match positions.get(&record.key) {
            Some(&i) => {
                if items[i].assigned_tags.is_none() {
                    items[i].assigned_tags = Some(tags);
                    restored += 1;
                }
            }
            None => orphans.push(record),
        }
    }

    if !orphans.is_empty() {
        tracing::warn!(
            count = orphans.len(),
            "Reviewed items missing from the input are kept at the end"
        );
        items.extend(orphans);
    }
    restored
}

impl ItemRepository for JsonItemRepository {
    fn load_all(&self) -> Result<Vec<Item>> {
        let mut items = self.input.load()?.ok_or_else(|| {
            TaggerError::not_found("item source", self.input.path().display().to_string())
        })?;

        let restored = match self.saved_items()? {
            Some(saved) => merge_saved(&mut items, saved),
            None => 0,
        };

        tracing::info!(
            path = %self.input.path().display(),
            count = items.len(),
            restored,
            "Loaded items"
        );
        Ok(items)
    }

    fn save_all(&self, items: &[Item]) -> Result<()> {
        self.output.save(&items.to_vec()).map_err(|e| {
            TaggerError::persistence(format!("{}: {}", self.output.path().display(), e))
        })?;
        tracing::debug!(path = %self.output.path().display(), count = items.len(), "Saved items");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tagger_core::REVIEWED_TAG;
    use tempfile::TempDir;

    const SOURCE: &str = r#"[
        {"key": "K1", "title": "First", "abstract": "One", "tags": [{"tag": "old"}]},
        {"key": "K2", "title": "Second", "abstract": "Two", "tags": []}
    ]"#;

    #[test]
    fn test_load_from_input() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("zotero_items.json");
        fs::write(&input, SOURCE).unwrap();

        let repo = JsonItemRepository::new(&input, temp_dir.path().join("tagged.json"), true);
        let items = repo.load_all().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].title, "Second");
        assert_eq!(repo.input_path(), input.as_path());
    }

    #[test]
    fn test_missing_input_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let repo = JsonItemRepository::new(
            temp_dir.path().join("missing.json"),
            temp_dir.path().join("tagged.json"),
            true,
        );
        let err = repo.load_all().unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_malformed_input_is_serialization_error() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("zotero_items.json");
        fs::write(&input, "[{\"title\": 3}]").unwrap();

        let repo = JsonItemRepository::new(&input, temp_dir.path().join("tagged.json"), false);
        assert!(matches!(
            repo.load_all(),
            Err(TaggerError::Serialization { .. })
        ));
    }

    #[test]
    fn test_save_never_touches_input() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("zotero_items.json");
        let output = temp_dir.path().join("tagged.json");
        fs::write(&input, SOURCE).unwrap();

        let repo = JsonItemRepository::new(&input, &output, false);
        let mut items = repo.load_all().unwrap();
        items[0].assigned_tags = Some(vec![REVIEWED_TAG.to_string()]);
        repo.save_all(&items).unwrap();

        assert_eq!(fs::read_to_string(&input).unwrap(), SOURCE);
        let written: Vec<Item> = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert!(written[0].is_reviewed());
        assert!(!written[1].is_reviewed());
    }

    #[test]
    fn test_resume_restores_saved_tags_by_key() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("zotero_items.json");
        let output = temp_dir.path().join("tagged.json");
        fs::write(&input, SOURCE).unwrap();

        let first = JsonItemRepository::new(&input, &output, true);
        let mut items = first.load_all().unwrap();
        items[1].assigned_tags = Some(vec!["X".to_string(), REVIEWED_TAG.to_string()]);
        first.save_all(&items).unwrap();

        let resumed = JsonItemRepository::new(&input, &output, true);
        assert_eq!(resumed.output_path(), output.as_path());
        let items = resumed.load_all().unwrap();
        assert!(!items[0].is_reviewed());
        assert!(items[1].is_reviewed());

        let fresh = JsonItemRepository::new(&input, &output, false);
        assert!(!fresh.load_all().unwrap()[1].is_reviewed());
    }

    #[test]
    fn test_resume_keeps_input_order_and_new_items() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("zotero_items.json");
        let output = temp_dir.path().join("tagged.json");
        fs::write(
            &output,
            r#"[{"key": "K2", "title": "Second", "abstract": "Two", "assigned_tags": ["reviewed"]}]"#,
        )
        .unwrap();
        fs::write(&input, SOURCE).unwrap();

        let items = JsonItemRepository::new(&input, &output, true).load_all().unwrap();
        let keys: Vec<_> = items.iter().map(|item| item.key.as_str()).collect();
        assert_eq!(keys, vec!["K1", "K2"]);
        assert!(items[0].assigned_tags.is_none());
        assert!(items[1].is_reviewed());
    }

    #[test]
    fn test_empty_output_falls_back_to_input() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("zotero_items.json");
        let output = temp_dir.path().join("tagged.json");
        fs::write(&input, SOURCE).unwrap();
        fs::write(&output, "").unwrap();

        let items = JsonItemRepository::new(&input, &output, true).load_all().unwrap();
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_reviewed_items_dropped_from_input_are_kept() {
        let mut items = vec![Item::new("K1", "First", "One")];
        let mut gone = Item::new("K9", "Removed", "Gone");
        gone.assigned_tags = Some(vec!["A".to_string(), REVIEWED_TAG.to_string()]);
        let unreviewed = Item::new("K8", "Never tagged", "x");

        let restored = merge_saved(&mut items, vec![gone, unreviewed]);
        assert_eq!(restored, 0);
        let keys: Vec<_> = items.iter().map(|item| item.key.as_str()).collect();
        assert_eq!(keys, vec!["K1", "K9"]);
    }

    #[test]
    fn test_save_failure_is_persistence_error() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("zotero_items.json");
        fs::write(&input, SOURCE).unwrap();
        // A directory where the output file should be makes the rename fail
        let output = temp_dir.path().join("tagged.json");
        fs::create_dir(&output).unwrap();
        fs::write(output.join("keep"), "x").unwrap();

        let repo = JsonItemRepository::new(&input, &output, false);
        let items = repo.load_all().unwrap();
        assert!(repo.save_all(&items).unwrap_err().is_persistence());
    }
}
