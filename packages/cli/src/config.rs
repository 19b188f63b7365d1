use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use contractform_sync::SyncConfig;
use contractform_workspace::DEFAULT_PREVIEW_ENDPOINT;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_NAME: &str = "contractform.config.json";

/// Contractform configuration file format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Directory holding one JSON file per contract
    #[serde(default = "default_store_dir")]
    pub store_dir: String,

    /// Identity to act as; absent means signed out
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Renderer endpoint used by `preview`
    #[serde(default = "default_preview_endpoint")]
    pub preview_endpoint: String,
}

fn default_store_dir() -> String {
    ".contracts".to_string()
}

fn default_poll_interval_ms() -> u64 {
    2000
}

fn default_preview_endpoint() -> String {
    DEFAULT_PREVIEW_ENDPOINT.to_string()
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("reading {}", config_path.display()))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("parsing {}", config_path.display()))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Get absolute path to the store directory
    pub fn get_store_dir(&self, cwd: &str) -> PathBuf {
        PathBuf::from(cwd).join(&self.store_dir)
    }

    pub fn sync_config(&self) -> SyncConfig {
        SyncConfig::default().with_poll_interval(Duration::from_millis(self.poll_interval_ms.max(1)))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_dir: default_store_dir(),
            owner_id: None,
            poll_interval_ms: default_poll_interval_ms(),
            preview_endpoint: default_preview_endpoint(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "storeDir": "data",
            "ownerId": "g-1",
            "pollIntervalMs": 500
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.store_dir, "data");
        assert_eq!(config.owner_id.as_deref(), Some("g-1"));
        assert_eq!(config.sync_config().poll_interval, Duration::from_millis(500));
        assert_eq!(config.preview_endpoint, "/render-contract");
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.store_dir, ".contracts");
        assert!(config.owner_id.is_none());
        assert_eq!(config.sync_config(), SyncConfig::default());
    }

    #[test]
    fn test_load_missing_file_gives_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path().to_str().unwrap()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(DEFAULT_CONFIG_NAME),
            r#"{ "ownerId": "me", "previewEndpoint": "http://render/pdf" }"#,
        )
        .unwrap();

        let cwd = dir.path().to_str().unwrap();
        let config = Config::load(cwd).unwrap();
        assert_eq!(config.owner_id.as_deref(), Some("me"));
        assert_eq!(config.preview_endpoint, "http://render/pdf");
        assert_eq!(config.get_store_dir(cwd), dir.path().join(".contracts"));
    }

    #[test]
    fn test_load_rejects_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(DEFAULT_CONFIG_NAME), "{").unwrap();
        assert!(Config::load(dir.path().to_str().unwrap()).is_err());
    }
}
