use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{env, fs, path::PathBuf};

use crate::summary::SummarizerConfig;

/// Environment fallback for the OpenWeather API key.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// OpenWeather credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenWeatherConfig {
    pub api_key: String,
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// geolocation = true
///
/// [openweather]
/// api_key = "..."
///
/// [summarizer]
/// base_url = "http://localhost:11434"
/// model = "llama3.2"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// IP-based geolocation toggle. When off, startup resolution goes
    /// straight to the unsupported-fallback city.
    #[serde(default = "default_geolocation")]
    pub geolocation: bool,

    #[serde(default)]
    pub openweather: Option<OpenWeatherConfig>,

    #[serde(default)]
    pub summarizer: SummarizerConfig,
}

fn default_geolocation() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            geolocation: default_geolocation(),
            openweather: None,
            summarizer: SummarizerConfig::default(),
        }
    }
}

impl Config {
    /// API key from config, falling back to the environment.
    pub fn openweather_api_key(&self) -> Option<String> {
        self.configured_api_key()
            .or_else(|| env::var(API_KEY_ENV).ok().filter(|key| !key.is_empty()))
    }

    /// API key from the config file only.
    pub fn configured_api_key(&self) -> Option<String> {
        self.openweather
            .as_ref()
            .map(|ow| ow.api_key.clone())
            .filter(|key| !key.is_empty())
    }

    pub fn set_openweather_api_key(&mut self, api_key: String) {
        self.openweather = Some(OpenWeatherConfig { api_key });
    }

    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "skycast", "skycast")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
