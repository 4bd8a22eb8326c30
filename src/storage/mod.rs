pub mod config;
pub mod kv;
pub mod rooms;

use anyhow::{Context, Result};
use std::env;
use std::fs;
use std::path::PathBuf;

pub use config::{Config, ConfigStorage, GeneralConfig, StorageConfig, TomlConfigStorage};
pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use rooms::{ALLOCATED_KEY, JsonRoomStorage, ROOMS_KEY, RoomStorage};

/// Ensure XDG data and config directories exist
/// Returns (data_dir, config_dir)
///
/// XDG Base Directory Specification:
/// - Data: $XDG_DATA_HOME/roomr (default: ~/.local/share/roomr)
/// - Config: $XDG_CONFIG_HOME/roomr (default: ~/.config/roomr)
pub fn ensure_directories() -> Result<(PathBuf, PathBuf)> {
    let home = env::var("HOME").context("HOME environment variable not set")?;
    let home_path = PathBuf::from(home);

    let data_dir = if let Ok(xdg_data) = env::var("XDG_DATA_HOME") {
        PathBuf::from(xdg_data).join("roomr")
    } else {
        home_path.join(".local/share/roomr")
    };

    let config_dir = if let Ok(xdg_config) = env::var("XDG_CONFIG_HOME") {
        PathBuf::from(xdg_config).join("roomr")
    } else {
        home_path.join(".config/roomr")
    };

    fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create data directory {:?}", data_dir))?;

    fs::create_dir_all(&config_dir)
        .with_context(|| format!("Failed to create config directory {:?}", config_dir))?;

    log::debug!("Data directory: {:?}", data_dir);
    log::debug!("Config directory: {:?}", config_dir);

    Ok((data_dir, config_dir))
}

/// Open room storage in the configured data directory
pub fn open_room_storage(config: &Config, default_data_dir: PathBuf) -> JsonRoomStorage<FileStore> {
    let data_dir = config
        .storage
        .data_dir
        .clone()
        .unwrap_or(default_data_dir);
    log::debug!("Room data directory: {:?}", data_dir);
    JsonRoomStorage::new(FileStore::new(data_dir))
}
