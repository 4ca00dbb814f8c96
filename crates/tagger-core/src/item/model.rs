//! Item domain model.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Sentinel appended to `assigned_tags` on every commit.
pub const REVIEWED_TAG: &str = "reviewed";

/// A taggable bibliographic record.
///
/// Field names follow the item file format (`key`, `title`, `abstract`,
/// `tags`, `assigned_tags`). Anything else found in a record is kept in
/// `extra` and written back untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Source-assigned unique identifier (the Zotero item key).
    pub key: String,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "abstract", default)]
    pub abstract_text: String,
    /// Tags carried over from the reference manager. Opaque to the review.
    /// `None` when the record had no `tags` field, so it is not added on save.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Value>>,
    /// Reviewer output. `None` until the item has been committed once.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_tags: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Item {
    pub fn new(
        key: impl Into<String>,
        title: impl Into<String>,
        abstract_text: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            abstract_text: abstract_text.into(),
            ..Default::default()
        }
    }

    /// True once a commit has stamped the item with the reviewed sentinel.
    pub fn is_reviewed(&self) -> bool {
        self.assigned_tags
            .as_ref()
            .is_some_and(|tags| tags.iter().any(|tag| tag == REVIEWED_TAG))
    }

    /// Names of the reference-manager tags, for display.
    ///
    /// Zotero stores tags as `{"tag": "...", "type": n}`; plain strings are
    /// accepted as well.
    pub fn source_tag_names(&self) -> Vec<&str> {
        self.tags
            .iter()
            .flatten()
            .filter_map(|value| match value {
                Value::String(name) => Some(name.as_str()),
                Value::Object(map) => map.get("tag").and_then(Value::as_str),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_minimal_record() {
        let item: Item = serde_json::from_value(json!({
            "key": "ABCD1234",
            "title": "On tagging",
            "abstract": "We tag things."
        }))
        .unwrap();

        assert_eq!(item.key, "ABCD1234");
        assert_eq!(item.abstract_text, "We tag things.");
        assert!(item.tags.is_none());
        assert!(item.assigned_tags.is_none());
        assert!(!item.is_reviewed());
    }

    #[test]
    fn test_unknown_fields_round_trip() {
        let source = json!({
            "key": "K1",
            "title": "T",
            "abstract": "A",
            "tags": [{"tag": "ecology", "type": 1}],
            "doi": "10.1000/xyz",
            "assigned_tags": ["B", "reviewed"]
        });

        let item: Item = serde_json::from_value(source.clone()).unwrap();
        assert_eq!(item.extra.get("doi"), Some(&json!("10.1000/xyz")));
        assert!(item.is_reviewed());
        assert_eq!(item.source_tag_names(), vec!["ecology"]);

        let written = serde_json::to_value(&item).unwrap();
        assert_eq!(written, source);
    }

    #[test]
    fn test_record_without_tags_round_trips_exactly() {
        let source = json!({"key": "K3", "title": "T", "abstract": "A"});
        let item: Item = serde_json::from_value(source.clone()).unwrap();
        assert!(item.source_tag_names().is_empty());
        assert_eq!(serde_json::to_value(&item).unwrap(), source);

        let with_empty = json!({"key": "K4", "title": "T", "abstract": "A", "tags": []});
        let item: Item = serde_json::from_value(with_empty.clone()).unwrap();
        assert_eq!(serde_json::to_value(&item).unwrap(), with_empty);
    }

    #[test]
    fn test_unreviewed_item_omits_assigned_tags() {
        let item = Item::new("K2", "Title", "Abstract");
        let written = serde_json::to_value(&item).unwrap();
        assert!(written.get("assigned_tags").is_none());
    }
}
