//! Ledger configuration (`~/.kotoba/ledger.toml`).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Where the ledger lives and which key it is stored under.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// SQLite database file holding the key-value store
    pub db_path: PathBuf,
    /// Storage key for the JSON-encoded ledger aggregate
    pub storage_key: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            db_path: Self::global_config_dir().join("ledger.db"),
            storage_key: crate::engine::DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

impl LedgerConfig {
    /// Get the global config directory path (~/.kotoba/)
    pub fn global_config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".kotoba")
    }

    /// Get the global config file path (~/.kotoba/ledger.toml)
    pub fn global_config_path() -> PathBuf {
        Self::global_config_dir().join("ledger.toml")
    }

    /// Load the config, falling back to defaults when the file is absent.
    pub fn load() -> Result<Self> {
        let path = Self::global_config_path();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::from_file(&path)
    }

    /// Load configuration from a specific file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read ledger config: {}", path.display()))?;

        let config: LedgerConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse ledger config: {}", path.display()))?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = LedgerConfig::default();
        assert!(config.db_path.ends_with(".kotoba/ledger.db"));
        assert_eq!(config.storage_key, "ledger:v1");
    }

    #[test]
    fn test_from_file_partial_override() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ledger.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "db_path = \"/tmp/kotoba-test/ledger.db\"").unwrap();

        let config = LedgerConfig::from_file(&path).unwrap();
        assert_eq!(config.db_path, PathBuf::from("/tmp/kotoba-test/ledger.db"));
        // Unset field keeps its default
        assert_eq!(config.storage_key, "ledger:v1");
    }

    #[test]
    fn test_from_file_rejects_bad_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ledger.toml");
        std::fs::write(&path, "db_path = [not toml").unwrap();

        assert!(LedgerConfig::from_file(&path).is_err());
    }
}
