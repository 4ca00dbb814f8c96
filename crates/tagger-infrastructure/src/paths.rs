//! Path resolution for the tagger configuration file.
//!
//! The configuration file is looked up in this order:
//!
//! ```text
//! $TAGGER_CONFIG                          # explicit override
//! ./config.toml                           # project-local (next to data/)
//! ~/.config/abstract-tagger/config.toml   # per-user (platform config dir)
//! ```
//!
//! Data file locations live inside the configuration itself (`[paths]`).

use std::path::{Path, PathBuf};

/// Environment variable that points at an explicit configuration file.
pub const CONFIG_ENV_VAR: &str = "TAGGER_CONFIG";
pub const CONFIG_FILE_NAME: &str = "config.toml";
const APP_DIR_NAME: &str = "abstract-tagger";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Platform config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Path management for the tagger.
pub struct TaggerPaths;

impl TaggerPaths {
    /// Returns the per-user configuration directory
    /// (e.g. `~/.config/abstract-tagger/`).
    pub fn user_config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR_NAME))
            .ok_or(PathError::ConfigDirNotFound)
    }

    /// Returns the per-user configuration file path.
    pub fn user_config_file() -> Result<PathBuf, PathError> {
        Ok(Self::user_config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Resolves which configuration file to read.
    ///
    /// Falls back to `./config.toml` when nothing exists yet, which is also
    /// where `tagger init-config` writes its template.
    pub fn resolve_config_file() -> PathBuf {
        let env_override = std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from);
        Self::resolve_config_file_from(
            env_override,
            Path::new(CONFIG_FILE_NAME),
            Self::user_config_file().ok(),
        )
    }

    /// Resolution logic with every input supplied by the caller.
    pub fn resolve_config_file_from(
        env_override: Option<PathBuf>,
        local: &Path,
        user: Option<PathBuf>,
    ) -> PathBuf {
        if let Some(path) = env_override.filter(|p| !p.as_os_str().is_empty()) {
            return path;
        }
        if local.exists() {
            return local.to_path_buf();
        }
        if let Some(user) = user
            && user.exists()
        {
            return user;
        }
        local.to_path_buf()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_env_override_wins() {
        let temp_dir = TempDir::new().unwrap();
        let local = temp_dir.path().join("config.toml");
        std::fs::write(&local, "").unwrap();

        let resolved = TaggerPaths::resolve_config_file_from(
            Some(PathBuf::from("/etc/tagger.toml")),
            &local,
            None,
        );
        assert_eq!(resolved, PathBuf::from("/etc/tagger.toml"));
    }

    #[test]
    fn test_local_file_before_user_file() {
        let temp_dir = TempDir::new().unwrap();
        let local = temp_dir.path().join("config.toml");
        let user = temp_dir.path().join("user.toml");
        std::fs::write(&local, "").unwrap();
        std::fs::write(&user, "").unwrap();

        let resolved = TaggerPaths::resolve_config_file_from(None, &local, Some(user));
        assert_eq!(resolved, local);
    }

    #[test]
    fn test_user_file_when_no_local_file() {
        let temp_dir = TempDir::new().unwrap();
        let local = temp_dir.path().join("config.toml");
        let user = temp_dir.path().join("user.toml");
        std::fs::write(&user, "").unwrap();

        let resolved = TaggerPaths::resolve_config_file_from(None, &local, Some(user.clone()));
        assert_eq!(resolved, user);
    }

    #[test]
    fn test_defaults_to_local_path() {
        let temp_dir = TempDir::new().unwrap();
        let local = temp_dir.path().join("config.toml");
        let user = temp_dir.path().join("missing.toml");

        let resolved = TaggerPaths::resolve_config_file_from(None, &local, Some(user));
        assert_eq!(resolved, local);
    }
}
