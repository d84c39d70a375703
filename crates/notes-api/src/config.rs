//! Configuration loading and management.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Service configuration, stored as `config.json` in the data directory.
///
/// The signing secret is deliberately not part of this file; it arrives via
/// CLI/environment and is passed to the token service at startup.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Token policy
    #[serde(default)]
    pub tokens: TokenConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenConfig {
    /// Bearer token lifetime in seconds (default: 1 hour)
    #[serde(default = "default_token_lifetime")]
    pub token_lifetime_secs: u64,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            token_lifetime_secs: default_token_lifetime(),
        }
    }
}

fn default_token_lifetime() -> u64 {
    3600 // 1 hour
}

impl Config {
    /// Load configuration from the data directory.
    pub fn load(data_path: &str) -> Result<Self> {
        let config_file = Path::new(data_path).join("config.json");

        if config_file.exists() {
            let content = std::fs::read_to_string(&config_file)
                .with_context(|| format!("Failed to read config file: {:?}", config_file))?;
            let config: Config =
                serde_json::from_str(&content).with_context(|| "Failed to parse config.json")?;
            tracing::info!("Loaded configuration from {:?}", config_file);
            Ok(config)
        } else {
            let config = Config::default();

            std::fs::create_dir_all(data_path)
                .with_context(|| format!("Failed to create data directory: {}", data_path))?;

            // Write default config for reference
            let content = serde_json::to_string_pretty(&config)?;
            std::fs::write(&config_file, content)
                .with_context(|| format!("Failed to write default config: {:?}", config_file))?;
            tracing::info!("Created default config at {:?}", config_file);

            Ok(config)
        }
    }
}
