#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Durable storage for the Geocoin world.
//!
//! State lives in two independent blobs: [`CACHE_DATA_KEY`] holds every
//! materialized cell with its coins and [`INVENTORY_KEY`] holds the player's
//! coins. A missing blob means "start empty". A blob that fails to decode is
//! discarded with a warning instead of failing startup.

use std::path::PathBuf;

use geocoin_core::Event;
use geocoin_world::WorldSnapshot;
use thiserror::Error;

pub mod codec;
mod store;

pub use store::{FileStore, MemoryStore, StateStore};

/// Key under which materialized cache contents are stored.
pub const CACHE_DATA_KEY: &str = "cacheData";

/// Key under which the player's inventory is stored.
pub const INVENTORY_KEY: &str = "inventory";

/// Errors raised while reading or writing persisted state.
#[derive(Debug, Error)]
pub enum StorageError {
    /// A persisted blob does not have the expected shape.
    #[error("persisted `{key}` blob is malformed: {reason}")]
    Malformed {
        /// Key of the offending blob.
        key: &'static str,
        /// Description of the first problem found.
        reason: String,
    },
    /// State could not be serialized.
    #[error("could not encode `{key}`")]
    Encode {
        /// Key of the blob being written.
        key: &'static str,
        /// Underlying serializer failure.
        #[source]
        source: serde_json::Error,
    },
    /// The backing store failed.
    #[error("{action} {} failed", .path.display())]
    Io {
        /// Operation that was attempted.
        action: &'static str,
        /// File the operation targeted.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
}

/// Loads and saves [`WorldSnapshot`] values through a [`StateStore`].
#[derive(Debug)]
pub struct Gateway<S> {
    store: S,
}

impl<S: StateStore> Gateway<S> {
    /// Wraps the provided store.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Read-only access to the underlying store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Reads both blobs, substituting empty state for missing or malformed ones.
    pub fn load(&self) -> Result<WorldSnapshot, StorageError> {
        let caches = self.load_blob(CACHE_DATA_KEY, codec::decode_cache_data)?;
        let inventory = self.load_blob(INVENTORY_KEY, codec::decode_inventory)?;
        log::info!(
            "loaded {} cells and {} held coins",
            caches.len(),
            inventory.len()
        );
        Ok(WorldSnapshot { caches, inventory })
    }

    /// Overwrites both blobs with the provided state.
    pub fn save(&mut self, snapshot: &WorldSnapshot) -> Result<(), StorageError> {
        let cache_data = codec::encode_cache_data(&snapshot.caches)?;
        let inventory = codec::encode_inventory(&snapshot.inventory)?;
        self.store.write(CACHE_DATA_KEY, &cache_data)?;
        self.store.write(INVENTORY_KEY, &inventory)?;
        log::debug!(
            "saved {} cells and {} held coins",
            snapshot.caches.len(),
            snapshot.inventory.len()
        );
        Ok(())
    }

    /// Deletes both blobs.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.store.remove(CACHE_DATA_KEY)?;
        self.store.remove(INVENTORY_KEY)
    }

    fn load_blob<T, F>(&self, key: &'static str, decode: F) -> Result<Vec<T>, StorageError>
    where
        F: FnOnce(&str) -> Result<Vec<T>, StorageError>,
    {
        let decoded = match self.store.read(key) {
            Ok(Some(text)) => decode(&text),
            Ok(None) => return Ok(Vec::new()),
            Err(error) => Err(error),
        };
        match decoded {
            Ok(values) => Ok(values),
            Err(error @ StorageError::Malformed { .. }) => {
                log::warn!("discarding persisted state: {error}");
                Ok(Vec::new())
            }
            Err(error) => Err(error),
        }
    }
}

/// Reports whether the events describe a change that must be persisted.
#[must_use]
pub fn should_persist(events: &[Event]) -> bool {
    events.iter().any(|event| {
        matches!(
            event,
            Event::CacheShown { .. }
                | Event::CoinTaken { .. }
                | Event::CoinGiven { .. }
                | Event::WorldReset
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use geocoin_core::{CellCoord, LatLng, MarkerId};

    #[test]
    fn moves_without_new_state_are_not_persisted() {
        let events = [
            Event::PlayerMoved {
                position: LatLng::new(0.0, 0.0),
                cell: CellCoord::new(0, 0),
            },
            Event::CacheHidden {
                cell: CellCoord::new(1, 1),
                marker: MarkerId::new(0),
            },
        ];
        assert!(!should_persist(&events));
        assert!(should_persist(&[Event::WorldReset]));
    }
}
