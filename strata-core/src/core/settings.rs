//! Vault location and settings persistence.
//!
//! Two small JSON documents are involved:
//!
//! - the application config (`config.json` in the OS config directory), which
//!   remembers which folder is the vault;
//! - the vault's own `.strata/settings.json`, which echoes its location so a
//!   vault folder is self-describing.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the hidden metadata directory inside a vault.
pub const META_DIR: &str = ".strata";

/// Application-wide configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// Folder holding the vault; `None` until the user picks one.
    #[serde(default)]
    pub vault_path: Option<PathBuf>,
}

/// The settings document stored inside a vault.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultSettings {
    pub vault_path: String,
}

/// Returns the path to the application config file.
///
/// - Linux: `~/.config/strata/config.json`
/// - macOS: `~/Library/Application Support/strata/config.json`
/// - Windows: `%APPDATA%/strata/config.json`
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("strata")
        .join("config.json")
}

/// Returns the default vault location: `~/Documents/Strata`.
pub fn default_vault_path() -> PathBuf {
    dirs::document_dir()
        .unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("Documents")
        })
        .join("Strata")
}

/// Loads the application config; returns defaults if the file is missing or corrupt.
pub fn load_config() -> AppConfig {
    load_config_from(&config_file_path())
}

pub fn load_config_from(path: &Path) -> AppConfig {
    match fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
            log::warn!("Ignoring corrupt config {}: {e}", path.display());
            AppConfig::default()
        }),
        Err(_) => AppConfig::default(),
    }
}

/// Saves the application config, creating parent directories as needed.
pub fn save_config_to(path: &Path, config: &AppConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string_pretty(config)?)?;
    Ok(())
}

/// The configured vault folder if it still exists, otherwise the default.
pub fn resolve_vault_path(config: &AppConfig) -> PathBuf {
    config
        .vault_path
        .as_ref()
        .filter(|p| p.is_dir())
        .cloned()
        .unwrap_or_else(default_vault_path)
}

/// Path of the settings echo inside `vault_root`.
pub fn vault_settings_path(vault_root: &Path) -> PathBuf {
    vault_root.join(META_DIR).join("settings.json")
}

/// Reads a vault's settings echo, if present and well-formed.
pub fn load_vault_settings(vault_root: &Path) -> Option<VaultSettings> {
    let raw = fs::read_to_string(vault_settings_path(vault_root)).ok()?;
    serde_json::from_str(&raw).ok()
}

/// Writes the settings echo unless one already exists.
pub fn ensure_vault_settings(vault_root: &Path) -> Result<()> {
    let path = vault_settings_path(vault_root);
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let settings = VaultSettings {
        vault_path: vault_root.to_string_lossy().to_string(),
    };
    fs::write(&path, serde_json::to_string_pretty(&settings)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = AppConfig {
            vault_path: Some(dir.path().join("vault")),
        };
        save_config_to(&path, &config).unwrap();
        assert_eq!(load_config_from(&path), config);

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("vaultPath"));
    }

    #[test]
    fn test_missing_or_corrupt_config_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        assert_eq!(load_config_from(&path), AppConfig::default());

        fs::write(&path, "not json").unwrap();
        assert_eq!(load_config_from(&path), AppConfig::default());
    }

    #[test]
    fn test_resolve_prefers_existing_configured_path() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig {
            vault_path: Some(dir.path().to_path_buf()),
        };
        assert_eq!(resolve_vault_path(&config), dir.path());

        let gone = AppConfig {
            vault_path: Some(dir.path().join("does-not-exist")),
        };
        assert_eq!(resolve_vault_path(&gone), default_vault_path());
        assert_eq!(resolve_vault_path(&AppConfig::default()), default_vault_path());
    }

    #[test]
    fn test_vault_settings_written_once() {
        let dir = TempDir::new().unwrap();
        ensure_vault_settings(dir.path()).unwrap();
        let settings = load_vault_settings(dir.path()).unwrap();
        assert_eq!(settings.vault_path, dir.path().to_string_lossy());

        fs::write(vault_settings_path(dir.path()), r#"{"vaultPath":"elsewhere"}"#).unwrap();
        ensure_vault_settings(dir.path()).unwrap();
        assert_eq!(load_vault_settings(dir.path()).unwrap().vault_path, "elsewhere");
    }
}
