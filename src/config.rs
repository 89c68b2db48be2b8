//! Catalog configuration, saved and loaded as JSON.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Store subdirectory under the platform data directory
pub const APP_DIR_NAME: &str = "scripthub";

/// Used when the platform has no data directory
pub const FALLBACK_DATA_DIR: &str = ".scripthub";

pub const DEFAULT_SHARE_BASE_URL: &str = "http://localhost:8080";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Where the user store lives
    pub data_dir: PathBuf,
    /// Origin that share links are built on
    pub share_base_url: String,
    /// Target directory for downloads
    pub download_dir: PathBuf,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            share_base_url: DEFAULT_SHARE_BASE_URL.to_string(),
            download_dir: PathBuf::from("."),
        }
    }
}

/// `<platform data dir>/scripthub`, or `./.scripthub`
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(FALLBACK_DATA_DIR))
}

impl CatalogConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from `path` if given, otherwise defaults
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize configuration to JSON")?;

        fs::write(&path, json)
            .with_context(|| format!("Failed to write configuration to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Load configuration from a JSON file. Missing keys take defaults.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read configuration from {:?}", path.as_ref()))?;

        let config: Self =
            serde_json::from_str(&content).context("Failed to parse configuration JSON")?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.data_dir.as_os_str().is_empty() {
            anyhow::bail!("Data directory must be specified");
        }

        if self.download_dir.as_os_str().is_empty() {
            anyhow::bail!("Download directory must be specified");
        }

        let url = self.share_base_url.trim();
        let Some(host) = url
            .strip_prefix("https://")
            .or_else(|| url.strip_prefix("http://"))
        else {
            anyhow::bail!(
                "Share base URL must start with http:// or https:// (got {:?})",
                self.share_base_url
            );
        };
        if host.trim_matches('/').is_empty() {
            anyhow::bail!("Share base URL is missing a host");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config_is_valid() {
        let config = CatalogConfig::default();
        assert!(config.validate().is_ok());
        assert!(
            config.data_dir.ends_with(APP_DIR_NAME) || config.data_dir.ends_with(FALLBACK_DATA_DIR)
        );
    }

    #[test]
    fn test_save_and_load_config() {
        let config = CatalogConfig {
            data_dir: PathBuf::from("/tmp/scripthub-data"),
            share_base_url: "https://scripts.example.com".to_string(),
            download_dir: PathBuf::from("/tmp/downloads"),
        };

        let file = NamedTempFile::new().unwrap();
        config.save_to_file(file.path()).unwrap();
        let loaded = CatalogConfig::load_from_file(file.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_config_takes_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"share_base_url": "https://hub.example.org"}}"#).unwrap();

        let loaded = CatalogConfig::load_from_file(file.path()).unwrap();
        assert_eq!(loaded.share_base_url, "https://hub.example.org");
        assert_eq!(loaded.download_dir, PathBuf::from("."));
    }

    #[test]
    fn test_load_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = CatalogConfig::load_from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse configuration JSON"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = CatalogConfig::load_from_file("/nonexistent/scripthub.json").unwrap_err();
        assert!(err.to_string().contains("Failed to read configuration"));
    }

    #[test]
    fn test_validate_rejects_bad_url() {
        let mut config = CatalogConfig::default();
        config.share_base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());

        config.share_base_url = "https://".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_paths() {
        let mut config = CatalogConfig::default();
        config.data_dir = PathBuf::new();
        assert!(config.validate().is_err());

        let mut config = CatalogConfig::default();
        config.download_dir = PathBuf::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_resolve_without_path_uses_defaults() {
        assert_eq!(CatalogConfig::resolve(None).unwrap(), CatalogConfig::default());
    }
}
