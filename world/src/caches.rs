//! Lazily generated per-cell coin contents.

use std::collections::BTreeMap;

use geocoin_core::{luck, CellCoord, Coin, TransferError, COIN_RATE_MOD, SPAWN_PROBABILITY};

/// Authoritative mapping from cache cells to the coins they currently hold.
///
/// A cell's coins are generated the first time the cell is referenced and are
/// never regenerated afterwards; later lookups observe every transfer made
/// since. Spawning and coin count share a single random draw per cell, so a
/// cache site always starts with fewer than `SPAWN_PROBABILITY * COIN_RATE_MOD`
/// coins.
#[derive(Clone, Debug, Default)]
pub struct CacheWorld {
    contents: BTreeMap<CellCoord, Vec<Coin>>,
}

impl CacheWorld {
    /// Creates an empty cache world with no materialized cells.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports whether the cell hosts a cache.
    #[must_use]
    pub fn should_spawn(cell: CellCoord) -> bool {
        luck(&cell.key()) < SPAWN_PROBABILITY
    }

    /// Returns the live coin list of the cell, generating it on first access.
    pub fn get_or_create(&mut self, cell: CellCoord) -> &mut Vec<Coin> {
        self.contents.entry(cell).or_insert_with(|| {
            let coins = generate_coins(cell);
            log::debug!("materialized cell {cell} with {} coins", coins.len());
            coins
        })
    }

    /// Returns the live coin list of a cache site, or rejects non-cache cells.
    pub(crate) fn cache_mut(&mut self, cell: CellCoord) -> Result<&mut Vec<Coin>, TransferError> {
        if !Self::should_spawn(cell) {
            return Err(TransferError::UnknownCache { cell });
        }
        Ok(self.get_or_create(cell))
    }

    /// Coins held by the cell, if it has been materialized.
    #[must_use]
    pub fn get(&self, cell: CellCoord) -> Option<&[Coin]> {
        self.contents.get(&cell).map(Vec::as_slice)
    }

    /// Number of materialized cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.contents.len()
    }

    /// Reports whether no cell has been materialized yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    /// Total number of coins held across every materialized cell.
    #[must_use]
    pub fn total_coins(&self) -> usize {
        self.contents.values().map(Vec::len).sum()
    }

    /// Iterates over materialized cells in coordinate order.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, &[Coin])> {
        self.contents
            .iter()
            .map(|(cell, coins)| (*cell, coins.as_slice()))
    }

    pub(crate) fn clear(&mut self) {
        self.contents.clear();
    }

    pub(crate) fn restore(&mut self, entries: Vec<(CellCoord, Vec<Coin>)>) {
        self.contents = entries.into_iter().collect();
    }
}

/// Number of coins a cell holds when first generated.
#[must_use]
pub fn initial_coin_count(cell: CellCoord) -> u32 {
    (luck(&cell.key()) * f64::from(COIN_RATE_MOD)).floor() as u32
}

fn generate_coins(cell: CellCoord) -> Vec<Coin> {
    (0..initial_coin_count(cell))
        .map(|index| Coin::new(cell, index))
        .collect()
}
