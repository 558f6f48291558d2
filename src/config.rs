use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub archive: ArchiveConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProviderConfig {
    /// Base URL of the Xtream-compatible provider, without a trailing slash
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveConfig {
    /// Default VOD category to archive when none is given on the command line
    #[serde(default)]
    pub category_id: String,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    /// Literal prefix stripped from item names during sanitization
    #[serde(default)]
    pub name_filter: String,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_manifest_file")]
    pub manifest_file: String,
}

// Default value functions
fn default_output_dir() -> String {
    "videos".to_string()
}
fn default_max_attempts() -> u32 {
    3
}
fn default_manifest_file() -> String {
    "download_links.txt".to_string()
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            category_id: String::new(),
            output_dir: default_output_dir(),
            name_filter: String::new(),
            max_attempts: default_max_attempts(),
            manifest_file: default_manifest_file(),
        }
    }
}

pub struct ConfigManager {
    config_dir: PathBuf,
    config_file: PathBuf,
    config: Config,
}

impl ConfigManager {
    /// Create a new ConfigManager and load existing config or create default
    pub fn new() -> Result<Self> {
        let project_dirs =
            ProjectDirs::from("", "", "vodgrab").context("Failed to determine config directory")?;

        let config_dir = project_dirs.config_dir().to_path_buf();
        let config_file = config_dir.join("config.toml");

        Self::with_file(config_dir, config_file)
    }

    /// Create a ConfigManager backed by an explicit config file path
    pub fn from_file(config_file: impl Into<PathBuf>) -> Result<Self> {
        let config_file = config_file.into();
        let config_dir = config_file
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        Self::with_file(config_dir, config_file)
    }

    fn with_file(config_dir: PathBuf, config_file: PathBuf) -> Result<Self> {
        // Create config directory if it doesn't exist
        if !config_dir.as_os_str().is_empty() && !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .with_context(|| format!("Failed to create config directory: {:?}", config_dir))?;
        }

        let config = if config_file.exists() {
            Self::load_config(&config_file)?
        } else {
            let default_config = Config::default();
            Self::save_config(&config_file, &default_config)?;
            default_config
        };

        Ok(Self {
            config_dir,
            config_file,
            config,
        })
    }

    /// Get a reference to the current config
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get a mutable reference to the current config
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// Save the current config to disk
    pub fn save(&self) -> Result<()> {
        Self::save_config(&self.config_file, &self.config)
    }

    /// Reload config from disk
    pub fn reload(&mut self) -> Result<()> {
        self.config = Self::load_config(&self.config_file)?;
        Ok(())
    }

    /// Get the config directory path
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Get the config file path
    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    /// Load config from file
    fn load_config(config_file: &Path) -> Result<Config> {
        let content = fs::read_to_string(config_file)
            .with_context(|| format!("Failed to read config file: {:?}", config_file))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", config_file))?;

        Ok(config)
    }

    /// Save config to file
    fn save_config(config_file: &Path, config: &Config) -> Result<()> {
        let content = toml::to_string_pretty(config).context("Failed to serialize config")?;

        fs::write(config_file, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_file))?;

        Ok(())
    }

    /// Create a sample config file for user reference
    pub fn create_sample_config(&self) -> Result<PathBuf> {
        let sample_file = self.config_dir.join("config.sample.toml");
        let sample_config = Config::default();
        Self::save_config(&sample_file, &sample_config)?;
        Ok(sample_file)
    }

    /// Validate the current configuration
    pub fn validate(&self) -> Result<()> {
        let provider = &self.config.provider;

        if provider.base_url.is_empty() {
            anyhow::bail!("provider.base_url is not set");
        }

        if provider.base_url.ends_with('/') {
            anyhow::bail!("provider.base_url must not end with a trailing slash");
        }

        if provider.username.is_empty() || provider.password.is_empty() {
            anyhow::bail!("provider.username and provider.password must both be set");
        }

        if self.config.archive.max_attempts == 0 {
            anyhow::bail!("archive.max_attempts must be greater than 0");
        }

        if self.config.archive.output_dir.is_empty() {
            anyhow::bail!("archive.output_dir cannot be empty");
        }

        Ok(())
    }
}
