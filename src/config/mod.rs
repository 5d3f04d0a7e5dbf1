use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable that overrides the config directory (used by tests)
pub const HOME_ENV: &str = "FIT_COACH_HOME";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub openai: OpenAiConfig,

    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,

    /// Prefer the OPENAI_API_KEY environment variable; this is a fallback.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_true")]
    pub show_welcome: bool,

    #[serde(default = "default_true")]
    pub color: bool,
}

// Default value functions
fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_temperature() -> f32 {
    0.3
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_true() -> bool {
    true
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            connect_timeout_seconds: default_connect_timeout(),
            api_key: None,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            show_welcome: default_true(),
            color: default_true(),
        }
    }
}

impl Config {
    /// Get config directory path (~/.fit-coach/)
    pub fn config_dir() -> Result<PathBuf> {
        if let Ok(dir) = std::env::var(HOME_ENV) {
            return Ok(PathBuf::from(dir));
        }

        let home = dirs::home_dir().context("Could not find home directory")?;
        Ok(home.join(".fit-coach"))
    }

    /// Get config file path (~/.fit-coach/config.toml)
    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from the given path, or the default location
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_file = match path {
            Some(path) => path.to_path_buf(),
            None => Self::config_file()?,
        };

        Self::load_from(&config_file)
    }

    /// Load configuration from a specific file, falling back to defaults when absent
    pub fn load_from(config_file: &Path) -> Result<Self> {
        if !config_file.exists() {
            tracing::debug!("Config file {:?} not found, using defaults", config_file);
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(config_file)
            .with_context(|| format!("Failed to read config file {}", config_file.display()))?;

        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", config_file.display()))?;

        tracing::debug!("Loaded config from {:?}", config_file);
        Ok(config)
    }

    /// Save configuration to a file, creating parent directories as needed
    pub fn save_to(&self, config_file: &Path) -> Result<()> {
        if let Some(parent) = config_file.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(config_file, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Apply command-line overrides on top of the loaded file
    pub fn with_overrides(mut self, model: Option<String>, temperature: Option<f32>) -> Self {
        if let Some(model) = model {
            self.openai.model = model;
        }
        if let Some(temperature) = temperature {
            self.openai.temperature = temperature;
        }
        self
    }
}
