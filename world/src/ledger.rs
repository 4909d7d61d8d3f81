//! Coin ownership transfers between caches and the player inventory.

use geocoin_core::{CellCoord, Coin, CoinLocation, TransferError};

use crate::caches::CacheWorld;

/// Player inventory and the only legal ways of moving coins in or out of it.
///
/// Every transfer locates the coin before mutating anything, so a failed
/// request leaves both the cache and the inventory untouched and a successful
/// one moves the coin in a single step.
#[derive(Clone, Debug, Default)]
pub struct CoinLedger {
    inventory: Vec<Coin>,
}

impl CoinLedger {
    /// Creates a ledger with an empty inventory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves `coin` out of the cache at `cell` and appends it to the inventory.
    ///
    /// A cell without a cache holds no coins, so naming one reports the coin
    /// as not found there.
    pub fn take(
        &mut self,
        caches: &mut CacheWorld,
        coin: Coin,
        cell: CellCoord,
    ) -> Result<(), TransferError> {
        let location = CoinLocation::Cache(cell);
        let cache = caches
            .cache_mut(cell)
            .map_err(|_| TransferError::NotFound { coin, location })?;
        let position = position_of(cache.as_slice(), coin, location)?;
        self.inventory.push(cache.remove(position));
        Ok(())
    }

    /// Moves `coin` out of the inventory and appends it to the cache at `cell`.
    pub fn give(
        &mut self,
        caches: &mut CacheWorld,
        coin: Coin,
        cell: CellCoord,
    ) -> Result<(), TransferError> {
        let cache = caches.cache_mut(cell)?;
        let position = position_of(&self.inventory, coin, CoinLocation::Inventory)?;
        cache.push(self.inventory.remove(position));
        Ok(())
    }

    /// Takes the coin most recently added to the cache at `cell`.
    pub fn take_latest(
        &mut self,
        caches: &mut CacheWorld,
        cell: CellCoord,
    ) -> Result<Coin, TransferError> {
        let coin = caches
            .cache_mut(cell)?
            .last()
            .copied()
            .ok_or(TransferError::CacheEmpty { cell })?;
        self.take(caches, coin, cell)?;
        Ok(coin)
    }

    /// Deposits the coin most recently added to the inventory into `cell`.
    pub fn give_latest(
        &mut self,
        caches: &mut CacheWorld,
        cell: CellCoord,
    ) -> Result<Coin, TransferError> {
        let coin = self
            .inventory
            .last()
            .copied()
            .ok_or(TransferError::InventoryEmpty)?;
        self.give(caches, coin, cell)?;
        Ok(coin)
    }

    /// Coins held by the player in the order they were collected.
    #[must_use]
    pub fn inventory(&self) -> &[Coin] {
        &self.inventory
    }

    /// Number of coins held by the player.
    #[must_use]
    pub fn total_inventory(&self) -> usize {
        self.inventory.len()
    }

    pub(crate) fn clear(&mut self) {
        self.inventory.clear();
    }

    pub(crate) fn restore(&mut self, inventory: Vec<Coin>) {
        self.inventory = inventory;
    }
}

fn position_of(coins: &[Coin], coin: Coin, location: CoinLocation) -> Result<usize, TransferError> {
    coins
        .iter()
        .position(|held| *held == coin)
        .ok_or(TransferError::NotFound { coin, location })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stocked_cache() -> (CacheWorld, CellCoord) {
        let cell = (0..)
            .map(|i| CellCoord::new(i, 7))
            .find(|cell| CacheWorld::should_spawn(*cell))
            .expect("cache site");
        let mut caches = CacheWorld::new();
        caches.get_or_create(cell).push(Coin::new(CellCoord::new(-1, -1), 0));
        (caches, cell)
    }

    #[test]
    fn take_appends_in_call_order() {
        let (mut caches, cell) = stocked_cache();
        let mut ledger = CoinLedger::new();
        let held: Vec<Coin> = caches.get(cell).expect("materialized").to_vec();

        for coin in held.iter().rev() {
            ledger.take(&mut caches, *coin, cell).expect("take");
        }

        let expected: Vec<Coin> = held.iter().rev().copied().collect();
        assert_eq!(ledger.inventory(), expected.as_slice());
        assert_eq!(caches.get(cell).map(<[Coin]>::len), Some(0));
    }

    #[test]
    fn give_without_coin_is_rejected() {
        let (mut caches, cell) = stocked_cache();
        let mut ledger = CoinLedger::new();
        let coin = Coin::new(CellCoord::new(5, 5), 1);
        let before = caches.total_coins();

        assert_eq!(
            ledger.give(&mut caches, coin, cell),
            Err(TransferError::NotFound {
                coin,
                location: CoinLocation::Inventory,
            })
        );
        assert_eq!(caches.total_coins(), before);
        assert_eq!(ledger.total_inventory(), 0);
    }

    #[test]
    fn take_from_cell_without_cache_is_not_found() {
        let mut caches = CacheWorld::new();
        let mut ledger = CoinLedger::new();
        let barren = (0..)
            .map(|j| CellCoord::new(-4, j))
            .find(|cell| !CacheWorld::should_spawn(*cell))
            .expect("barren cell");
        let coin = Coin::new(barren, 0);

        assert_eq!(
            ledger.take(&mut caches, coin, barren),
            Err(TransferError::NotFound {
                coin,
                location: CoinLocation::Cache(barren),
            })
        );
        assert!(caches.is_empty());
        assert_eq!(ledger.total_inventory(), 0);
    }

    #[test]
    fn latest_transfers_use_the_top_of_each_collection() {
        let (mut caches, cell) = stocked_cache();
        let mut ledger = CoinLedger::new();
        let top = *caches.get(cell).and_then(<[Coin]>::last).expect("top coin");

        assert_eq!(ledger.take_latest(&mut caches, cell), Ok(top));
        assert_eq!(ledger.give_latest(&mut caches, cell), Ok(top));
        assert_eq!(
            ledger.give_latest(&mut caches, cell),
            Err(TransferError::InventoryEmpty)
        );
    }
}
