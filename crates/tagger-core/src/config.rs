//! Application configuration models.
//!
//! The configuration is a single TOML document with `[zotero]`, `[gemini]`,
//! `[paths]` and `[review]` tables. Every field has a default so that a
//! missing file still yields a usable (if unconfigured) configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{Result, TaggerError};

/// Placeholder written by `tagger init-config` for the Zotero library id.
pub const PLACEHOLDER_LIBRARY_ID: &str = "YOUR_LIBRARY_ID";
/// Placeholder written by `tagger init-config` for the Zotero API key.
pub const PLACEHOLDER_ZOTERO_API_KEY: &str = "YOUR_API_KEY";
/// Placeholder written by `tagger init-config` for the Gemini API key.
pub const PLACEHOLDER_GEMINI_API_KEY: &str = "YOUR_GEMINI_API_KEY";

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Returns true when a credential is empty or still holds a template value.
pub fn is_placeholder(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty()
        || trimmed == PLACEHOLDER_LIBRARY_ID
        || trimmed == PLACEHOLDER_ZOTERO_API_KEY
        || trimmed == PLACEHOLDER_GEMINI_API_KEY
        || (trimmed.starts_with("YOUR_")
            && trimmed.chars().all(|c| c.is_ascii_uppercase() || c == '_'))
}

/// Root of `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub zotero: ZoteroConfig,
    pub gemini: GeminiConfig,
    pub paths: PathsConfig,
    pub review: ReviewConfig,
}

/// Zotero library type, which selects the `/users` or `/groups` API prefix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LibraryType {
    #[default]
    User,
    Group,
}

impl LibraryType {
    /// Path segment used by the Zotero web API.
    pub fn api_segment(self) -> &'static str {
        match self {
            LibraryType::User => "users",
            LibraryType::Group => "groups",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoteroConfig {
    pub library_id: String,
    pub api_key: String,
    pub library_type: LibraryType,
}

impl Default for ZoteroConfig {
    fn default() -> Self {
        Self {
            library_id: PLACEHOLDER_LIBRARY_ID.to_string(),
            api_key: PLACEHOLDER_ZOTERO_API_KEY.to_string(),
            library_type: LibraryType::User,
        }
    }
}

impl ZoteroConfig {
    /// Fails with `Unconfigured` if either credential is a placeholder.
    pub fn ensure_configured(&self) -> Result<()> {
        if is_placeholder(&self.library_id) || is_placeholder(&self.api_key) {
            return Err(TaggerError::unconfigured(
                "Zotero",
                "update zotero.library_id and zotero.api_key in config.toml \
                 (see https://www.zotero.org/settings/keys)",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub request_timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: PLACEHOLDER_GEMINI_API_KEY.to_string(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl GeminiConfig {
    /// Fails with `Unconfigured` if the API key is a placeholder.
    pub fn ensure_configured(&self) -> Result<()> {
        if is_placeholder(&self.api_key) {
            return Err(TaggerError::unconfigured(
                "Gemini",
                "update gemini.api_key in config.toml with your Google AI API key",
            ));
        }
        Ok(())
    }
}

/// File locations. Relative paths are resolved against the working directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Item source written by `tagger fetch`; never modified by a review.
    pub items_input: PathBuf,
    /// Review output, rewritten after every commit.
    pub items_output: PathBuf,
    /// Taxonomy CSV (`Category`, `Tag`, `Definition`).
    pub taxonomy: PathBuf,
    /// Directory for `review.log`.
    pub log_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            items_input: PathBuf::from("data/zotero_items.json"),
            items_output: PathBuf::from("data/tagged_items.json"),
            taxonomy: PathBuf::from("data/metadata_Dictionary_v2.csv"),
            log_dir: PathBuf::from("data"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewConfig {
    /// Load from the output file when it exists, so earlier reviews show up.
    pub resume: bool,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self { resume: true }
    }
}
