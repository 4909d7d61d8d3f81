//! JSON encoding of the persisted blobs.
//!
//! `cacheData` is an array of `[cellKey, coins]` pairs and `inventory` an
//! array of coins, where every coin is written as `{"i", "j", "index"}`.

use std::collections::BTreeSet;

use geocoin_core::{CellCoord, Coin};

use crate::{StorageError, CACHE_DATA_KEY, INVENTORY_KEY};

/// Encodes materialized cells as `[["i,j", [coin, ...]], ...]`.
pub fn encode_cache_data(caches: &[(CellCoord, Vec<Coin>)]) -> Result<String, StorageError> {
    let entries: Vec<(String, &[Coin])> = caches
        .iter()
        .map(|(cell, coins)| (cell.key(), coins.as_slice()))
        .collect();
    serde_json::to_string(&entries).map_err(|source| StorageError::Encode {
        key: CACHE_DATA_KEY,
        source,
    })
}

/// Decodes the `cacheData` blob, rejecting bad keys and duplicate cells.
pub fn decode_cache_data(text: &str) -> Result<Vec<(CellCoord, Vec<Coin>)>, StorageError> {
    let entries: Vec<(String, Vec<Coin>)> =
        serde_json::from_str(text).map_err(|error| malformed(CACHE_DATA_KEY, error))?;

    let mut seen = BTreeSet::new();
    let mut caches = Vec::with_capacity(entries.len());
    for (key, coins) in entries {
        let cell = key
            .parse::<CellCoord>()
            .map_err(|error| malformed(CACHE_DATA_KEY, error))?;
        if !seen.insert(cell) {
            return Err(malformed(CACHE_DATA_KEY, format!("cell {cell} appears twice")));
        }
        caches.push((cell, coins));
    }
    Ok(caches)
}

/// Encodes the inventory as an array of coins.
pub fn encode_inventory(inventory: &[Coin]) -> Result<String, StorageError> {
    serde_json::to_string(inventory).map_err(|source| StorageError::Encode {
        key: INVENTORY_KEY,
        source,
    })
}

/// Decodes the `inventory` blob.
pub fn decode_inventory(text: &str) -> Result<Vec<Coin>, StorageError> {
    serde_json::from_str(text).map_err(|error| malformed(INVENTORY_KEY, error))
}

fn malformed(key: &'static str, reason: impl ToString) -> StorageError {
    StorageError::Malformed {
        key,
        reason: reason.to_string(),
    }
}
