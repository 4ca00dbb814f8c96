//! Configuration service implementation.
//!
//! Loads `config.toml` once and hands out the parsed `AppConfig`.

use std::fs;
use std::path::{Path, PathBuf};

use tagger_core::config::AppConfig;
use tagger_core::{Result, TaggerError};

use crate::paths::TaggerPaths;

const TEMPLATE_HEADER: &str = "\
# Abstract Tagger configuration
#
# Replace the YOUR_* placeholders with real credentials.
# Zotero keys: https://www.zotero.org/settings/keys
# Gemini keys: https://aistudio.google.com/app/apikey

";

/// Reads the application configuration from a TOML file.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
}

impl ConfigService {
    /// Uses the resolved configuration file (see `TaggerPaths`).
    pub fn new() -> Self {
        Self::with_path(TaggerPaths::resolve_config_file())
    }

    /// Creates a service for a custom path (for testing)
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the configuration.
    ///
    /// A missing file yields `AppConfig::default()` (placeholder credentials,
    /// default data paths). A file that exists but does not parse is an error.
    pub fn load(&self) -> Result<AppConfig> {
        if !self.path.exists() {
            tracing::warn!(
                path = %self.path.display(),
                "Config file not found, using defaults"
            );
            return Ok(AppConfig::default());
        }

        let content = fs::read_to_string(&self.path)?;
        let config: AppConfig = toml::from_str(&content).map_err(|e| {
            TaggerError::config(format!("{}: {}", self.path.display(), e))
        })?;

        tracing::debug!(path = %self.path.display(), "Loaded config");
        Ok(config)
    }

    /// Writes a template configuration with placeholder credentials.
    ///
    /// Refuses to overwrite an existing file.
    pub fn write_template(&self) -> Result<()> {
        if self.path.exists() {
            return Err(TaggerError::config(format!(
                "{} already exists, not overwriting",
                self.path.display()
            )));
        }

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let body = toml::to_string_pretty(&AppConfig::default())?;
        fs::write(&self.path, format!("{TEMPLATE_HEADER}{body}"))?;

        // Credentials live here; keep the file private on Unix
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))?;
        }

        tracing::info!(path = %self.path.display(), "Wrote config template");
        Ok(())
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new()
    }
}
