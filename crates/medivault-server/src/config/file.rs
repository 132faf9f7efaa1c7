// crates/medivault-server/src/config/file.rs
// File-based configuration from ~/.medivault/config.toml

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3030;
pub const DEFAULT_INDEX_NAME: &str = "medical-records";
pub const DEFAULT_TOP_K: u32 = 5;

/// Top-level config structure
#[derive(Debug, Deserialize, Default)]
pub struct MediVaultConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

/// `[server]` section
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

/// `[search]` section
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Index queried when the request names none
    pub index_name: String,
    /// Result count when the request gives no topK
    pub top_k: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            index_name: DEFAULT_INDEX_NAME.to_string(),
            top_k: DEFAULT_TOP_K,
        }
    }
}

impl MediVaultConfig {
    /// Load config from ~/.medivault/config.toml
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load config from an explicit path, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => {
                    debug!(path = %path.display(), "Loaded config from file");
                    config
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Failed to parse config file");
                    Self::default()
                }
            },
            Err(_) => {
                debug!(path = %path.display(), "Config file not found, using defaults");
                Self::default()
            }
        }
    }

    /// Get the config file path
    pub fn config_path() -> PathBuf {
        super::data_dir().join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml = r#"
[server]
port = 8080

[search]
index_name = "cardiology"
"#;
        let config: MediVaultConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, DEFAULT_HOST);
        assert_eq!(config.search.index_name, "cardiology");
        assert_eq!(config.search.top_k, DEFAULT_TOP_K);
    }

    #[test]
    fn test_parse_empty_config() {
        let config: MediVaultConfig = toml::from_str("").unwrap();
        assert_eq!(config.server.port, DEFAULT_PORT);
        assert_eq!(config.search.index_name, DEFAULT_INDEX_NAME);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = MediVaultConfig::load_from(&dir.path().join("absent.toml"));
        assert_eq!(config.server.port, DEFAULT_PORT);
    }

    #[test]
    fn test_load_invalid_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server\nport = ").unwrap();
        let config = MediVaultConfig::load_from(&path);
        assert_eq!(config.server.port, DEFAULT_PORT);
    }
}
