use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Channel carrying UI -> host commands (`saveToDownloads`, `scanFile`).
pub const MEDIA_STORE_CHANNEL: &str = "com.example.pdfscanner/media_store";

/// Channel carrying the shared-PDF handoff (`getInitialPdfPath`, `openPdf`).
pub const INTENT_CHANNEL: &str = "com.example.pdfscanner/intents";

/// First SDK level with scoped storage (Android 10).
pub const MODERN_STORAGE_MIN_SDK: u32 = 29;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HostConfig {
    pub media_store_channel: String,
    pub intent_channel: String,
    /// Prefix of cache copies made from content locators.
    pub cache_file_prefix: String,
    pub cache_file_suffix: String,
    pub modern_storage_min_sdk: u32,
    /// Overrides the platform cache directory when set.
    pub cache_dir: Option<PathBuf>,
    /// Overrides the public Downloads directory when set (desktop only).
    pub downloads_dir: Option<PathBuf>,
    /// SDK level reported by desktop brokers. Lets the legacy policy run off-device.
    pub desktop_sdk_int: u32,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            media_store_channel: MEDIA_STORE_CHANNEL.to_string(),
            intent_channel: INTENT_CHANNEL.to_string(),
            cache_file_prefix: "shared_".to_string(),
            cache_file_suffix: ".pdf".to_string(),
            modern_storage_min_sdk: MODERN_STORAGE_MIN_SDK,
            cache_dir: None,
            downloads_dir: None,
            desktop_sdk_int: MODERN_STORAGE_MIN_SDK,
        }
    }
}

/// Load a config file, falling back to defaults when it does not exist.
pub fn load_config(path: &Path) -> Result<HostConfig> {
    if !path.exists() {
        return Ok(HostConfig::default());
    }

    let content = std::fs::read_to_string(path)?;
    let config: HostConfig = serde_json::from_str(&content)?;
    Ok(config)
}

pub fn save_config(path: &Path, config: &HostConfig) -> Result<()> {
    let content = serde_json::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config.intent_channel, INTENT_CHANNEL);
        assert_eq!(config.modern_storage_min_sdk, 29);
        assert!(config.cache_dir.is_none());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("host.json");
        std::fs::write(&path, r#"{ "desktopSdkInt": 28, "cacheFilePrefix": "in_" }"#).unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.desktop_sdk_int, 28);
        assert_eq!(config.cache_file_prefix, "in_");
        assert_eq!(config.cache_file_suffix, ".pdf");
        assert_eq!(config.media_store_channel, MEDIA_STORE_CHANNEL);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("host.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = load_config(&path).unwrap_err();
        assert_eq!(err.code(), "SERIALIZATION_ERROR");
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("host.json");
        let config = HostConfig {
            downloads_dir: Some(dir.path().join("Download")),
            ..HostConfig::default()
        };
        save_config(&path, &config).unwrap();

        let loaded = load_config(&path).unwrap();
        assert_eq!(loaded.downloads_dir, config.downloads_dir);
    }
}
