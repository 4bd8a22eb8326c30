use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// General configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Ask before deleting a room in the TUI
    #[serde(default = "default_confirm_delete")]
    pub confirm_delete: bool,

    /// How long notifications stay on screen
    #[serde(default = "default_flash_message_duration_ms")]
    pub flash_message_duration_ms: u64,

    /// Minimum level written to the log file
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Minimum level shown as a notification
    #[serde(default = "default_flash_level")]
    pub flash_level: String,

    /// Built-in theme name ("dark" or "light")
    #[serde(default = "default_theme")]
    pub theme: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        GeneralConfig {
            confirm_delete: default_confirm_delete(),
            flash_message_duration_ms: default_flash_message_duration_ms(),
            log_level: default_log_level(),
            flash_level: default_flash_level(),
            theme: default_theme(),
        }
    }
}

/// Where room data lives
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Override for the data directory (default: XDG data dir)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

// Default value functions for serde
fn default_confirm_delete() -> bool {
    true
}

fn default_flash_message_duration_ms() -> u64 {
    2500
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_flash_level() -> String {
    "info".to_string()
}

fn default_theme() -> String {
    "dark".to_string()
}

/// Trait for configuration storage
pub trait ConfigStorage {
    /// Load configuration from file
    fn load(&self) -> Result<Config>;

    /// Save configuration to file
    fn save(&self, config: &Config) -> Result<()>;

    /// Get the config file path
    fn path(&self) -> &PathBuf;

    /// Create default configuration file if it doesn't exist
    fn create_default(&self) -> Result<()>;
}

/// TOML-based implementation of ConfigStorage
pub struct TomlConfigStorage {
    path: PathBuf,
}

impl TomlConfigStorage {
    /// Create a new TomlConfigStorage with the given path
    pub fn new(path: PathBuf) -> Self {
        TomlConfigStorage { path }
    }
}

impl ConfigStorage for TomlConfigStorage {
    fn load(&self) -> Result<Config> {
        use anyhow::Context;
        use std::fs;

        // First run: write the commented example and use defaults
        if !self.path.exists() {
            log::info!(
                "Config file not found at {:?}, creating default configuration",
                self.path
            );
            self.create_default()?;
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read config from {:?}", self.path))?;

        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {:?}", self.path))?;

        log::info!("Loaded configuration from {:?}", self.path);
        log::debug!(
            "Config: theme={}, confirm_delete={}",
            config.general.theme,
            config.general.confirm_delete
        );

        Ok(config)
    }

    fn save(&self, config: &Config) -> Result<()> {
        use anyhow::Context;
        use std::fs;

        let toml_str =
            toml::to_string_pretty(config).with_context(|| "Failed to serialize configuration")?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {:?}", parent))?;
        }

        fs::write(&self.path, toml_str)
            .with_context(|| format!("Failed to write config to {:?}", self.path))?;

        log::debug!("Saved configuration to {:?}", self.path);

        Ok(())
    }

    fn path(&self) -> &PathBuf {
        &self.path
    }

    fn create_default(&self) -> Result<()> {
        use anyhow::Context;
        use std::fs;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {:?}", parent))?;
        }

        let example_config = include_str!("../../roomr.toml.example");

        fs::write(&self.path, example_config)
            .with_context(|| format!("Failed to create default config at {:?}", self.path))?;

        log::info!("Created default configuration at {:?}", self.path);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = GeneralConfig::default();
        assert!(config.confirm_delete);
        assert_eq!(config.flash_message_duration_ms, 2500);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.theme, "dark");
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [general]
            confirm_delete = false

            [storage]
            data_dir = "/tmp/rooms"
            "#,
        )
        .unwrap();

        assert!(!config.general.confirm_delete);
        assert_eq!(config.general.flash_message_duration_ms, 2500);
        assert_eq!(config.storage.data_dir, Some(PathBuf::from("/tmp/rooms")));
    }

    #[test]
    fn test_example_config_parses() {
        let config: Config = toml::from_str(include_str!("../../roomr.toml.example")).unwrap();
        assert_eq!(config.general.theme, "dark");
        assert!(config.storage.data_dir.is_none());
    }

    #[test]
    fn test_load_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = TomlConfigStorage::new(dir.path().join("roomr").join("roomr.toml"));

        let config = storage.load().unwrap();
        assert!(storage.path().exists());
        assert!(config.general.confirm_delete);

        let mut changed = config.clone();
        changed.general.theme = "light".to_string();
        storage.save(&changed).unwrap();
        assert_eq!(storage.load().unwrap().general.theme, "light");
    }
}
