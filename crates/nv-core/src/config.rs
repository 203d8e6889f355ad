use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{NvError, NvResult};

/// Top-level daemon configuration (loaded from notevault.toml)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NvConfig {
    pub server: ServerConfig,
    pub crypto: CryptoConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// TCP listen address for the encrypt/decrypt API (default: 127.0.0.1:8920)
    pub listen: String,
    /// Log level (default: info)
    pub log_level: String,
    /// Log format: "json" or "text"
    pub log_format: String,
}

/// Field-encryption configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CryptoConfig {
    /// Environment variable holding the master key secret
    /// (default: NOTEVAULT_MASTER_KEY). The value itself never appears
    /// in the config file.
    pub key_env: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: "127.0.0.1:8920".into(),
            log_level: "info".into(),
            log_format: "json".into(),
        }
    }
}

impl Default for CryptoConfig {
    fn default() -> Self {
        Self {
            key_env: "NOTEVAULT_MASTER_KEY".into(),
        }
    }
}

impl NvConfig {
    /// Load configuration from a TOML file, falling back to defaults when
    /// the file does not exist.
    pub fn load(path: &Path) -> NvResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| NvError::Config(format!("parsing {}: {e}", path.display())))
    }
}
