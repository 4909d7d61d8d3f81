#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Geocoin engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems and
//! the rendering layer to react to. Generation helpers live in [`grid`] and
//! [`luck`] so every component agrees on cell identity and random draws.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod grid;
pub mod luck;

pub use grid::{CellBounds, GridIndex};
pub use luck::luck;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Geocoin. Go find some caches.";

/// Side length of a single grid cell measured in degrees.
pub const TILE_DEGREES: f64 = 1e-4;

/// Number of cells on either side of the player that are considered nearby.
pub const NEIGHBORHOOD_SIZE: i32 = 8;

/// Probability that a given cell hosts a cache.
pub const SPAWN_PROBABILITY: f64 = 0.1;

/// Multiplier applied to a cell's random draw to derive its initial coin count.
pub const COIN_RATE_MOD: u32 = 100;

/// Position the player starts from and returns to after a reset.
pub const HOME: LatLng = LatLng::new(36.9995, -122.0533);

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Relocates the player and refreshes the caches shown around them.
    MoveTo {
        /// Geographic position the player moved to.
        position: LatLng,
    },
    /// Moves a specific coin from a cache into the player's inventory.
    Take {
        /// Coin the player wants to collect.
        coin: Coin,
        /// Cache currently holding the coin.
        cell: CellCoord,
    },
    /// Moves a specific coin from the player's inventory into a cache.
    Give {
        /// Coin the player wants to deposit.
        coin: Coin,
        /// Cache that should receive the coin.
        cell: CellCoord,
    },
    /// Takes whichever coin was most recently added to the cache.
    TakeAny {
        /// Cache to take a coin from.
        cell: CellCoord,
    },
    /// Deposits the coin most recently added to the inventory.
    GiveAny {
        /// Cache that should receive the coin.
        cell: CellCoord,
    },
    /// Discards all cache contents and the inventory, then recenters at home.
    ResetAll,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Confirms that the player moved to a new position.
    PlayerMoved {
        /// Geographic position of the player after the move.
        position: LatLng,
        /// Cell containing the new position.
        cell: CellCoord,
    },
    /// Announces that a cache entered the player's neighborhood.
    CacheShown {
        /// Cell hosting the cache.
        cell: CellCoord,
        /// Handle the rendering layer should bind its marker to.
        marker: MarkerId,
        /// Number of coins held by the cache when it was shown.
        coins: usize,
    },
    /// Announces that a cache left the player's neighborhood.
    ///
    /// The coins held by the cache are retained by the world.
    CacheHidden {
        /// Cell hosting the cache.
        cell: CellCoord,
        /// Handle previously assigned to the cache marker.
        marker: MarkerId,
    },
    /// Confirms that a coin moved from a cache into the inventory.
    CoinTaken {
        /// Coin that changed hands.
        coin: Coin,
        /// Cache the coin was taken from.
        cell: CellCoord,
    },
    /// Confirms that a coin moved from the inventory into a cache.
    CoinGiven {
        /// Coin that changed hands.
        coin: Coin,
        /// Cache that received the coin.
        cell: CellCoord,
    },
    /// Reports that a transfer request was rejected without changing state.
    TransferRejected {
        /// Cache named by the rejected request.
        cell: CellCoord,
        /// Specific reason the transfer failed.
        reason: TransferError,
    },
    /// Confirms that all caches and the inventory were discarded.
    WorldReset,
}

/// Geographic position expressed in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    lat: f64,
    lng: f64,
}

impl LatLng {
    /// Creates a new position from latitude and longitude in degrees.
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Latitude of the position in degrees.
    #[must_use]
    pub const fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude of the position in degrees.
    #[must_use]
    pub const fn lng(&self) -> f64 {
        self.lng
    }

    /// Returns the position shifted by the provided offsets.
    #[must_use]
    pub fn offset(self, d_lat: f64, d_lng: f64) -> Self {
        Self::new(self.lat + d_lat, self.lng + d_lng)
    }
}

impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lng)
    }
}

/// Compass directions the player can be nudged in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Toward increasing latitude.
    North,
    /// Toward increasing longitude.
    East,
    /// Toward decreasing latitude.
    South,
    /// Toward decreasing longitude.
    West,
}

/// Location of a single grid cell expressed as integer `(i, j)` coordinates.
///
/// `i` indexes latitude bands and `j` indexes longitude bands. The pair is the
/// only identity a cell has; [`CellCoord::key`] renders the canonical string
/// form used for random draws and persisted state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    i: i32,
    j: i32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(i: i32, j: i32) -> Self {
        Self { i, j }
    }

    /// Latitude index of the cell.
    #[must_use]
    pub const fn i(&self) -> i32 {
        self.i
    }

    /// Longitude index of the cell.
    #[must_use]
    pub const fn j(&self) -> i32 {
        self.j
    }

    /// Canonical `"{i},{j}"` key identifying the cell.
    #[must_use]
    pub fn key(&self) -> String {
        self.to_string()
    }

    /// Returns the cell displaced by the provided offsets.
    #[must_use]
    pub const fn offset(self, di: i32, dj: i32) -> Self {
        Self::new(self.i.saturating_add(di), self.j.saturating_add(dj))
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.i, self.j)
    }
}

impl FromStr for CellCoord {
    type Err = ParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (i, j) = value
            .split_once(',')
            .ok_or_else(|| ParseError::CellKey(value.to_owned()))?;
        let i = i
            .trim()
            .parse::<i32>()
            .map_err(|_| ParseError::CellKey(value.to_owned()))?;
        let j = j
            .trim()
            .parse::<i32>()
            .map_err(|_| ParseError::CellKey(value.to_owned()))?;
        Ok(Self::new(i, j))
    }
}

/// Unit of collectible currency.
///
/// A coin remembers the cell it was generated in and its sequence number
/// within that cell's first generation. Neither ever changes, regardless of
/// which cache or inventory currently holds the coin.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coin {
    i: i32,
    j: i32,
    index: u32,
}

impl Coin {
    /// Creates a coin minted in `origin` with the provided sequence number.
    #[must_use]
    pub const fn new(origin: CellCoord, index: u32) -> Self {
        Self {
            i: origin.i(),
            j: origin.j(),
            index,
        }
    }

    /// Cell the coin was generated in.
    #[must_use]
    pub const fn origin(&self) -> CellCoord {
        CellCoord::new(self.i, self.j)
    }

    /// Zero-based sequence number within the origin cell.
    #[must_use]
    pub const fn index(&self) -> u32 {
        self.index
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}#{}", self.i, self.j, self.index)
    }
}

impl FromStr for Coin {
    type Err = ParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::Coin(value.to_owned());
        let (cell, index) = value.trim().split_once('#').ok_or_else(invalid)?;
        let (i, j) = cell.split_once(':').ok_or_else(invalid)?;
        let i = i.parse::<i32>().map_err(|_| invalid())?;
        let j = j.parse::<i32>().map_err(|_| invalid())?;
        let index = index.parse::<u32>().map_err(|_| invalid())?;
        Ok(Self::new(CellCoord::new(i, j), index))
    }
}

/// Handle the world assigns to each materialized cache marker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerId(u32);

impl MarkerId {
    /// Creates a new marker handle with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the handle.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Collection a coin was expected to be found in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CoinLocation {
    /// The player's inventory.
    Inventory,
    /// The cache hosted by the provided cell.
    Cache(CellCoord),
}

impl fmt::Display for CoinLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inventory => write!(f, "inventory"),
            Self::Cache(cell) => write!(f, "cache {cell}"),
        }
    }
}

/// Reasons a coin transfer may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum TransferError {
    /// The coin is not held by the collection it was expected in.
    #[error("coin {coin} is not in the {location}")]
    NotFound {
        /// Coin named by the request.
        coin: Coin,
        /// Collection that was searched.
        location: CoinLocation,
    },
    /// The cache holds no coins to take.
    #[error("cache {cell} is empty")]
    CacheEmpty {
        /// Cell hosting the empty cache.
        cell: CellCoord,
    },
    /// The inventory holds no coins to give.
    #[error("inventory is empty")]
    InventoryEmpty,
    /// The cell does not host a cache.
    #[error("no cache at {cell}")]
    UnknownCache {
        /// Cell named by the request.
        cell: CellCoord,
    },
}

/// Errors produced while parsing textual cell keys or coin identifiers.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The value is not a `"{i},{j}"` cell key.
    #[error("'{0}' is not a valid cell key")]
    CellKey(String),
    /// The value is not an `"{i}:{j}#{index}"` coin identifier.
    #[error("'{0}' is not a valid coin identifier")]
    Coin(String),
}

#[cfg(test)]
mod tests {
    use super::{CellCoord, Coin, ParseError};
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn cell_key_uses_canonical_format() {
        assert_eq!(CellCoord::new(0, 0).key(), "0,0");
        assert_eq!(CellCoord::new(-3, 12).key(), "-3,12");
    }

    #[test]
    fn cell_key_parses_back_into_coordinate() {
        let cell = CellCoord::new(369_994, -1_220_533);
        assert_eq!(cell.key().parse::<CellCoord>(), Ok(cell));
    }

    #[test]
    fn malformed_cell_key_is_rejected() {
        assert_eq!(
            "12;4".parse::<CellCoord>(),
            Err(ParseError::CellKey("12;4".to_owned()))
        );
        assert!("a,b".parse::<CellCoord>().is_err());
    }

    #[test]
    fn coin_identity_ignores_nothing() {
        let origin = CellCoord::new(4, -2);
        assert_eq!(Coin::new(origin, 3), Coin::new(origin, 3));
        assert_ne!(Coin::new(origin, 3), Coin::new(origin, 4));
        assert_ne!(Coin::new(origin, 3), Coin::new(CellCoord::new(4, -1), 3));
    }

    #[test]
    fn coin_identifier_parses_back_into_coin() {
        let coin = Coin::new(CellCoord::new(-7, 19), 5);
        assert_eq!(coin.to_string(), "-7:19#5");
        assert_eq!(coin.to_string().parse::<Coin>(), Ok(coin));
        assert!("7:19".parse::<Coin>().is_err());
    }

    #[test]
    fn coin_serializes_with_flat_origin_fields() {
        let coin = Coin::new(CellCoord::new(1, 2), 0);
        assert_round_trip(&coin);
    }

    #[test]
    fn cell_coord_round_trips_through_bincode() {
        assert_round_trip(&CellCoord::new(-1, 1));
    }
}
