//! ZoteroClient - reads top-level library items from the Zotero web API.

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{Map, Value};

use tagger_core::config::{LibraryType, ZoteroConfig};
use tagger_core::item::Item;
use tagger_core::{Result, TaggerError};

const BASE_URL: &str = "https://api.zotero.org";
const API_VERSION: &str = "3";
/// Largest page the Zotero API serves.
pub const PAGE_SIZE: usize = 100;

/// Read-only client for one Zotero library.
#[derive(Clone)]
pub struct ZoteroClient {
    client: Client,
    base_url: String,
    library_id: String,
    api_key: String,
    library_type: LibraryType,
}

impl ZoteroClient {
    pub fn new(
        library_id: impl Into<String>,
        api_key: impl Into<String>,
        library_type: LibraryType,
    ) -> Self {
        Self {
            client: Client::new(),
            base_url: BASE_URL.to_string(),
            library_id: library_id.into(),
            api_key: api_key.into(),
            library_type,
        }
    }

    /// Builds a client from the `[zotero]` config table, rejecting
    /// placeholder credentials.
    pub fn from_config(config: &ZoteroConfig) -> Result<Self> {
        config.ensure_configured()?;
        Ok(Self::new(
            config.library_id.clone(),
            config.api_key.clone(),
            config.library_type,
        ))
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn items_url(&self) -> String {
        format!(
            "{}/{}/{}/items/top",
            self.base_url.trim_end_matches('/'),
            self.library_type.api_segment(),
            self.library_id
        )
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert("Zotero-API-Version", HeaderValue::from_static(API_VERSION));
        let key = HeaderValue::from_str(&self.api_key)
            .map_err(|_| TaggerError::config("zotero.api_key contains invalid characters"))?;
        headers.insert("Zotero-API-Key", key);
        Ok(headers)
    }

    /// Fetches every top-level item in the library, one page at a time.
    pub async fn fetch_top_items(&self) -> Result<Vec<ZoteroItem>> {
        let url = self.items_url();
        let headers = self.headers()?;
        let mut items = Vec::new();
        let mut start = 0usize;

        loop {
            let response = self
                .client
                .get(&url)
                .headers(headers.clone())
                .query(&[
                    ("format", "json".to_string()),
                    ("limit", PAGE_SIZE.to_string()),
                    ("start", start.to_string()),
                ])
                .send()
                .await
                .map_err(|e| TaggerError::network(format!("Zotero API request failed: {e}")))?;

            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                return Err(map_http_error(status, body));
            }

            let total = response
                .headers()
                .get("Total-Results")
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.parse::<usize>().ok());

            let page: Vec<ZoteroItem> = response.json().await.map_err(|e| {
                TaggerError::network(format!("Failed to parse Zotero response: {e}"))
            })?;
            let page_len = page.len();
            items.extend(page);
            start += page_len;

            tracing::debug!(fetched = start, total = ?total, "Fetched Zotero page");

            if is_last_page(page_len, start, total) {
                break;
            }
        }

        tracing::info!(count = items.len(), "Fetched Zotero items");
        Ok(items)
    }
}

fn is_last_page(page_len: usize, fetched: usize, total: Option<usize>) -> bool {
    match total {
        Some(total) => page_len == 0 || fetched >= total,
        None => page_len < PAGE_SIZE,
    }
}

fn map_http_error(status: StatusCode, body: String) -> TaggerError {
    let detail = body.trim();
    match status {
        StatusCode::FORBIDDEN => TaggerError::network(format!(
            "Zotero API returned 403: check zotero.api_key and its library permissions ({detail})"
        )),
        StatusCode::NOT_FOUND => TaggerError::network(format!(
            "Zotero API returned 404: check zotero.library_id and zotero.library_type ({detail})"
        )),
        _ => TaggerError::network(format!(
            "Zotero API returned {}: {}",
            status.as_u16(),
            detail
        )),
    }
}

/// One entry of a Zotero `items` response (only the fields the tagger uses).
#[derive(Debug, Clone, Deserialize)]
pub struct ZoteroItem {
    pub key: String,
    #[serde(default)]
    pub data: ZoteroItemData,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ZoteroItemData {
    #[serde(default)]
    pub title: String,
    #[serde(rename = "abstractNote", default)]
    pub abstract_note: String,
    #[serde(default)]
    pub tags: Vec<Value>,
}

/// Keeps items with a non-blank abstract and maps them to review items.
pub fn items_with_abstracts(items: Vec<ZoteroItem>) -> Vec<Item> {
    items
        .into_iter()
        .filter(|item| !item.data.abstract_note.trim().is_empty())
        .map(|item| Item {
            key: item.key,
            title: item.data.title,
            abstract_text: item.data.abstract_note,
            tags: Some(item.data.tags),
            assigned_tags: None,
            extra: Map::new(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn zotero_item(key: &str, abstract_note: Option<&str>) -> ZoteroItem {
        let mut data = json!({
            "title": format!("Title {key}"),
            "itemType": "journalArticle",
            "tags": [{"tag": "peat", "type": 1}]
        });
        if let Some(text) = abstract_note {
            data["abstractNote"] = json!(text);
        }
        serde_json::from_value(json!({"key": key, "version": 7, "data": data})).unwrap()
    }

    #[test]
    fn test_items_without_abstract_are_dropped() {
        let items = items_with_abstracts(vec![
            zotero_item("K1", Some("Peat stores carbon.")),
            zotero_item("K2", None),
            zotero_item("K3", Some("   ")),
            zotero_item("K4", Some("Fens differ from bogs.")),
        ]);

        let keys: Vec<_> = items.iter().map(|item| item.key.as_str()).collect();
        assert_eq!(keys, vec!["K1", "K4"]);
        assert_eq!(items[0].title, "Title K1");
        assert_eq!(items[0].abstract_text, "Peat stores carbon.");
        assert_eq!(items[0].source_tag_names(), vec!["peat"]);
        assert!(items[0].assigned_tags.is_none());
    }

    #[test]
    fn test_mapped_item_uses_item_file_field_names() {
        let items = items_with_abstracts(vec![zotero_item("K1", Some("text"))]);
        let value = serde_json::to_value(&items[0]).unwrap();
        assert_eq!(value["key"], "K1");
        assert_eq!(value["abstract"], "text");
        assert!(value.get("assigned_tags").is_none());
    }

    #[test]
    fn test_items_url_per_library_type() {
        let user = ZoteroClient::new("42", "key", LibraryType::User);
        assert_eq!(user.items_url(), "https://api.zotero.org/users/42/items/top");

        let group = ZoteroClient::new("7", "key", LibraryType::Group)
            .with_base_url("http://localhost:8080/");
        assert_eq!(group.items_url(), "http://localhost:8080/groups/7/items/top");
    }

    #[test]
    fn test_paging_stops_at_total_or_short_page() {
        assert!(!is_last_page(100, 100, Some(250)));
        assert!(is_last_page(50, 250, Some(250)));
        assert!(is_last_page(0, 200, Some(250)));
        assert!(!is_last_page(100, 100, None));
        assert!(is_last_page(12, 112, None));
    }

    #[test]
    fn test_from_config_rejects_placeholders() {
        let err = ZoteroClient::from_config(&ZoteroConfig::default())
            .err()
            .unwrap();
        assert!(err.is_unconfigured());
    }

    #[test]
    fn test_forbidden_mentions_api_key() {
        let err = map_http_error(StatusCode::FORBIDDEN, "Forbidden".to_string());
        assert!(matches!(err, TaggerError::Network(ref msg) if msg.contains("zotero.api_key")));
    }
}
