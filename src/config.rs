use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{LumenError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LumenConfig {
    pub plugins: PluginsConfig,
    pub secrets: SecretsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginsConfig {
    /// Root directory external plugins are installed into.
    pub directory: PathBuf,
    /// Base URL of the plugin registry service used for update lookups
    /// and archive downloads.
    pub registry_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecretsConfig {
    pub db_path: PathBuf,
    /// Initial routing target for the fallback-wrapped secrets store.
    pub use_fallback: bool,
}

impl Default for LumenConfig {
    fn default() -> Self {
        Self {
            plugins: PluginsConfig {
                directory: PathBuf::from("plugins"),
                registry_url: "https://plugins.lumen.dev".to_string(),
            },
            secrets: SecretsConfig {
                db_path: PathBuf::from("lumen_secrets_db"),
                use_fallback: false,
            },
        }
    }
}

impl LumenConfig {
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        // Override with environment variables
        if let Ok(dir) = std::env::var("LUMEN_PLUGINS_DIR") {
            config.plugins.directory = PathBuf::from(dir);
        }

        if let Ok(url) = std::env::var("LUMEN_PLUGIN_REGISTRY_URL") {
            if !url.trim().is_empty() {
                config.plugins.registry_url = url;
            }
        }

        if let Ok(path) = std::env::var("LUMEN_SECRETS_DB") {
            config.secrets.db_path = PathBuf::from(path);
        }

        if let Ok(flag) = std::env::var("LUMEN_SECRETS_USE_FALLBACK") {
            config.secrets.use_fallback =
                matches!(flag.as_str(), "1" | "true" | "TRUE" | "yes" | "on");
        }

        Ok(config)
    }

    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| LumenError::config_error(format!("Failed to read config file: {}", e)))?;

        let config: LumenConfig = toml::from_str(&content)
            .map_err(|e| LumenError::config_error(format!("Failed to parse config file: {}", e)))?;

        Ok(config)
    }
}
