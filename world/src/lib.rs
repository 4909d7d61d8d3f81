#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Geocoin.
//!
//! [`World`] owns every piece of mutable game state: the lazily generated
//! cache contents, the player's inventory and the set of caches currently
//! shown around the player. Adapters mutate it exclusively through [`apply`]
//! and observe it through the [`query`] module.

mod caches;
mod ledger;
mod viewport;

pub use caches::{initial_coin_count, CacheWorld};
pub use ledger::CoinLedger;
pub use viewport::{Viewport, ViewportDiff};

use geocoin_core::{
    CellCoord, Coin, Command, Event, GridIndex, LatLng, TransferError, HOME, NEIGHBORHOOD_SIZE,
    TILE_DEGREES, WELCOME_BANNER,
};

/// Owned copy of the state that outlives a process.
///
/// Shown caches and the player position are deliberately absent; they are
/// recomputed from the player's next move.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WorldSnapshot {
    /// Materialized cells and the coins they hold, ordered by cell.
    pub caches: Vec<(CellCoord, Vec<Coin>)>,
    /// Coins held by the player in collection order.
    pub inventory: Vec<Coin>,
}

impl WorldSnapshot {
    /// Total number of coins recorded by the snapshot.
    #[must_use]
    pub fn total_coins(&self) -> usize {
        self.inventory.len() + self.caches.iter().map(|(_, coins)| coins.len()).sum::<usize>()
    }
}

/// Represents the authoritative Geocoin world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    grid: GridIndex,
    home: LatLng,
    player: LatLng,
    caches: CacheWorld,
    ledger: CoinLedger,
    viewport: Viewport,
}

impl World {
    /// Creates an empty world with the player standing at [`HOME`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_home(HOME)
    }

    /// Creates an empty world with the player standing at `home`.
    #[must_use]
    pub fn with_home(home: LatLng) -> Self {
        Self {
            banner: WELCOME_BANNER,
            grid: GridIndex::new(TILE_DEGREES),
            home,
            player: home,
            caches: CacheWorld::new(),
            ledger: CoinLedger::new(),
            viewport: Viewport::new(),
        }
    }

    /// Rebuilds a world from previously persisted state.
    ///
    /// Nothing is shown until the player's first move.
    #[must_use]
    pub fn from_snapshot(home: LatLng, snapshot: WorldSnapshot) -> Self {
        let mut world = Self::with_home(home);
        world.caches.restore(snapshot.caches);
        world.ledger.restore(snapshot.inventory);
        world
    }

    /// Consumes the world, returning the state that should be persisted.
    #[must_use]
    pub fn teardown(self) -> WorldSnapshot {
        query::snapshot(&self)
    }

    /// Moves the player and shows or hides caches accordingly.
    pub fn move_to(&mut self, position: LatLng, out_events: &mut Vec<Event>) {
        self.player = position;
        let center = self.grid.cell_of(position);
        out_events.push(Event::PlayerMoved {
            position,
            cell: center,
        });

        let diff = self.viewport.on_move(
            &self.grid,
            center,
            NEIGHBORHOOD_SIZE,
            CacheWorld::should_spawn,
        );
        for (cell, marker) in diff.hidden {
            out_events.push(Event::CacheHidden { cell, marker });
        }
        for (cell, marker) in diff.shown {
            let coins = self.caches.get_or_create(cell).len();
            out_events.push(Event::CacheShown {
                cell,
                marker,
                coins,
            });
        }
    }

    /// Moves `coin` from the cache at `cell` into the inventory.
    pub fn take(&mut self, coin: Coin, cell: CellCoord) -> Result<(), TransferError> {
        self.ledger.take(&mut self.caches, coin, cell)
    }

    /// Moves `coin` from the inventory into the cache at `cell`.
    pub fn give(&mut self, coin: Coin, cell: CellCoord) -> Result<(), TransferError> {
        self.ledger.give(&mut self.caches, coin, cell)
    }

    /// Takes the coin most recently added to the cache at `cell`.
    pub fn take_any(&mut self, cell: CellCoord) -> Result<Coin, TransferError> {
        self.ledger.take_latest(&mut self.caches, cell)
    }

    /// Deposits the most recently collected coin into the cache at `cell`.
    pub fn give_any(&mut self, cell: CellCoord) -> Result<Coin, TransferError> {
        self.ledger.give_latest(&mut self.caches, cell)
    }

    /// Discards every cache and the inventory, then recenters at home.
    pub fn reset(&mut self, out_events: &mut Vec<Event>) {
        log::info!(
            "resetting world: dropping {} cells and {} held coins",
            self.caches.len(),
            self.ledger.total_inventory()
        );
        for (cell, marker) in self.viewport.hide_all() {
            out_events.push(Event::CacheHidden { cell, marker });
        }
        self.caches.clear();
        self.ledger.clear();
        out_events.push(Event::WorldReset);
        self.move_to(self.home, out_events);
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Rejected transfers leave the world untouched and are reported through
/// [`Event::TransferRejected`].
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    let outcome = match command {
        Command::MoveTo { position } => {
            world.move_to(position, out_events);
            Ok(())
        }
        Command::Take { coin, cell } => world
            .take(coin, cell)
            .map(|()| out_events.push(Event::CoinTaken { coin, cell }))
            .map_err(|reason| (cell, reason)),
        Command::Give { coin, cell } => world
            .give(coin, cell)
            .map(|()| out_events.push(Event::CoinGiven { coin, cell }))
            .map_err(|reason| (cell, reason)),
        Command::TakeAny { cell } => world
            .take_any(cell)
            .map(|coin| out_events.push(Event::CoinTaken { coin, cell }))
            .map_err(|reason| (cell, reason)),
        Command::GiveAny { cell } => world
            .give_any(cell)
            .map(|coin| out_events.push(Event::CoinGiven { coin, cell }))
            .map_err(|reason| (cell, reason)),
        Command::ResetAll => {
            world.reset(out_events);
            Ok(())
        }
    };

    if let Err((cell, reason)) = outcome {
        log::warn!("rejected transfer at {cell}: {reason}");
        out_events.push(Event::TransferRejected { cell, reason });
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{CacheWorld, Viewport, World, WorldSnapshot};
    use geocoin_core::{CellCoord, Coin, GridIndex, LatLng, MarkerId};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Grid used to map positions onto cells.
    #[must_use]
    pub fn grid(world: &World) -> &GridIndex {
        &world.grid
    }

    /// Position the player returns to after a reset.
    #[must_use]
    pub fn home(world: &World) -> LatLng {
        world.home
    }

    /// Current position of the player.
    #[must_use]
    pub fn player_position(world: &World) -> LatLng {
        world.player
    }

    /// Cell the player is currently standing in.
    #[must_use]
    pub fn player_cell(world: &World) -> CellCoord {
        world.grid.cell_of(world.player)
    }

    /// Coins held by the player in collection order.
    #[must_use]
    pub fn inventory(world: &World) -> &[Coin] {
        world.ledger.inventory()
    }

    /// Number of coins held by the player.
    #[must_use]
    pub fn total_inventory(world: &World) -> usize {
        world.ledger.total_inventory()
    }

    /// Coins currently held by a materialized cell.
    #[must_use]
    pub fn cache(world: &World, cell: CellCoord) -> Option<&[Coin]> {
        world.caches.get(cell)
    }

    /// Read-only access to every materialized cell.
    #[must_use]
    pub fn caches(world: &World) -> &CacheWorld {
        &world.caches
    }

    /// Read-only access to the shown cache set.
    #[must_use]
    pub fn viewport(world: &World) -> &Viewport {
        &world.viewport
    }

    /// Cells currently shown to the rendering layer, with their markers.
    #[must_use]
    pub fn shown_caches(world: &World) -> Vec<(CellCoord, MarkerId)> {
        world.viewport.iter().collect()
    }

    /// Coins held across the inventory and every materialized cell.
    #[must_use]
    pub fn total_coins(world: &World) -> usize {
        world.ledger.total_inventory() + world.caches.total_coins()
    }

    /// Captures an owned copy of the persistent state.
    #[must_use]
    pub fn snapshot(world: &World) -> WorldSnapshot {
        WorldSnapshot {
            caches: world
                .caches
                .iter()
                .map(|(cell, coins)| (cell, coins.to_vec()))
                .collect(),
            inventory: world.ledger.inventory().to_vec(),
        }
    }
}
