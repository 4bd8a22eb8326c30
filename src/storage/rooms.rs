use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

use super::kv::KeyValueStore;
use crate::models::{Room, RoomRegistry};

/// Key holding the JSON array of rooms
pub const ROOMS_KEY: &str = "hostelRooms";

/// Key holding the JSON array of allocated room numbers
pub const ALLOCATED_KEY: &str = "allocatedRooms";

/// Trait for room registry persistence
pub trait RoomStorage {
    /// Load the registry from storage
    fn load(&self) -> Result<RoomRegistry>;

    /// Save the registry to storage
    fn save(&self, registry: &RoomRegistry) -> Result<()>;
}

/// JSON persistence of the registry as two independent blobs
pub struct JsonRoomStorage<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> JsonRoomStorage<S> {
    pub fn new(store: S) -> Self {
        JsonRoomStorage { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Read and parse one blob; a missing key loads as empty,
    /// an unparseable one is quarantined and loads as empty
    fn load_blob<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T> {
        let Some(contents) = self.store.get(key)? else {
            return Ok(T::default());
        };

        match serde_json::from_str::<T>(&contents) {
            Ok(value) => Ok(value),
            Err(e) => {
                log::warn!("Stored '{}' is corrupted, starting empty: {}", key, e);
                if let Err(backup_err) = self.store.quarantine(key) {
                    log::error!("Failed to back up corrupted '{}': {}", key, backup_err);
                }
                Ok(T::default())
            }
        }
    }
}

impl<S: KeyValueStore> RoomStorage for JsonRoomStorage<S> {
    fn load(&self) -> Result<RoomRegistry> {
        let rooms: Vec<Room> = self.load_blob(ROOMS_KEY)?;
        let allocated: Vec<String> = self.load_blob(ALLOCATED_KEY)?;

        let registry = RoomRegistry::from_parts(rooms, allocated);
        log::info!(
            "Loaded {} rooms ({} allocated)",
            registry.len(),
            registry.stats().allocated
        );

        Ok(registry)
    }

    fn save(&self, registry: &RoomRegistry) -> Result<()> {
        let rooms = serde_json::to_string(registry.rooms())
            .context("Failed to serialize rooms")?;
        let allocated: Vec<&str> = registry.allocated_rooms().collect();
        let allocated =
            serde_json::to_string(&allocated).context("Failed to serialize allocated rooms")?;

        self.store.set(ROOMS_KEY, &rooms)?;
        self.store.set(ALLOCATED_KEY, &allocated)?;

        log::debug!("Saved {} rooms", registry.len());
        Ok(())
    }
}
