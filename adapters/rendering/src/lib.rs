#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Geocoin adapters.
//!
//! [`MapView`] follows the world's event stream and keeps one marker per
//! shown cache. It never mutates world state; adapters turn clicks on a
//! marker's popup into `Command`s of their own. Coin lists are read through a
//! lookup closure at frame time so popups always reflect the live contents.

use std::collections::BTreeMap;

use anyhow::Result as AnyResult;
use geocoin_core::{CellBounds, CellCoord, Coin, Event, GridIndex, LatLng, MarkerId};
use glam::DVec2;

/// Whether a cache popup shows its coin list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PopupState {
    /// Only the summary line is visible.
    #[default]
    Collapsed,
    /// The summary and every coin are visible.
    Expanded,
}

impl PopupState {
    fn toggled(self) -> Self {
        match self {
            Self::Collapsed => Self::Expanded,
            Self::Expanded => Self::Collapsed,
        }
    }
}

/// Marker drawn for a single shown cache.
#[derive(Clone, Debug, PartialEq)]
pub struct Marker {
    cell: CellCoord,
    bounds: CellBounds,
    popup: PopupState,
}

impl Marker {
    /// Cell hosting the cache.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        self.cell
    }

    /// Rectangle covered by the marker.
    #[must_use]
    pub const fn bounds(&self) -> CellBounds {
        self.bounds
    }

    /// Current popup state.
    #[must_use]
    pub const fn popup(&self) -> PopupState {
        self.popup
    }

    /// Middle of the marker as `(lat, lng)`.
    #[must_use]
    pub fn center(&self) -> DVec2 {
        (to_vec(self.bounds.south_west()) + to_vec(self.bounds.north_east())) * 0.5
    }
}

/// Map state reconstructed from world events.
#[derive(Debug)]
pub struct MapView {
    grid: GridIndex,
    player: Option<LatLng>,
    markers: BTreeMap<MarkerId, Marker>,
}

impl MapView {
    /// Creates an empty map using the world's grid.
    #[must_use]
    pub fn new(grid: GridIndex) -> Self {
        Self {
            grid,
            player: None,
            markers: BTreeMap::new(),
        }
    }

    /// Applies world events to the marker set.
    pub fn handle(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::PlayerMoved { position, .. } => self.player = Some(*position),
                Event::CacheShown { cell, marker, .. } => {
                    let created = Marker {
                        cell: *cell,
                        bounds: self.grid.cell_bounds(*cell),
                        popup: PopupState::Collapsed,
                    };
                    let _ = self.markers.insert(*marker, created);
                }
                Event::CacheHidden { marker, .. } => {
                    let _ = self.markers.remove(marker);
                }
                Event::TransferRejected { cell, reason } => {
                    log::debug!("ignoring rejected action at {cell}: {reason}");
                }
                Event::CoinTaken { .. } | Event::CoinGiven { .. } | Event::WorldReset => {}
            }
        }
    }

    /// Opens or closes the popup of the cache at `cell`.
    ///
    /// Returns the new state, or `None` when no marker is shown for the cell.
    pub fn toggle_popup(&mut self, cell: CellCoord) -> Option<PopupState> {
        let marker = self.markers.values_mut().find(|marker| marker.cell == cell)?;
        marker.popup = marker.popup.toggled();
        Some(marker.popup)
    }

    /// Marker shown for the cache at `cell`.
    #[must_use]
    pub fn marker_at(&self, cell: CellCoord) -> Option<&Marker> {
        self.markers.values().find(|marker| marker.cell == cell)
    }

    /// Number of markers currently shown.
    #[must_use]
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    /// Reports whether no marker is shown.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Builds a frame with markers ordered nearest-first.
    pub fn frame<'a, F>(&self, coins_for: F, status: &str) -> Frame
    where
        F: Fn(CellCoord) -> Option<&'a [Coin]>,
    {
        let origin = self.player.map(to_vec);
        let mut markers: Vec<(f64, MarkerFrame)> = self
            .markers
            .values()
            .map(|marker| {
                let coins = coins_for(marker.cell).unwrap_or_default();
                let center = marker.center();
                let distance = origin.map_or(0.0, |origin| origin.distance(center));
                let frame = MarkerFrame {
                    cell: marker.cell,
                    center,
                    coin_count: coins.len(),
                    coins: match marker.popup {
                        PopupState::Expanded => coins.to_vec(),
                        PopupState::Collapsed => Vec::new(),
                    },
                    popup: marker.popup,
                };
                (distance, frame)
            })
            .collect();
        markers.sort_by(|(a, left), (b, right)| {
            a.total_cmp(b).then_with(|| left.cell.cmp(&right.cell))
        });

        Frame {
            player: self.player,
            status: status.to_owned(),
            markers: markers.into_iter().map(|(_, frame)| frame).collect(),
        }
    }
}

/// Presentation of a single marker within a [`Frame`].
#[derive(Clone, Debug, PartialEq)]
pub struct MarkerFrame {
    /// Cell hosting the cache.
    pub cell: CellCoord,
    /// Middle of the marker as `(lat, lng)`.
    pub center: DVec2,
    /// Coins currently held by the cache.
    pub coin_count: usize,
    /// Coins listed in the popup; empty while collapsed.
    pub coins: Vec<Coin>,
    /// Popup state at the time the frame was built.
    pub popup: PopupState,
}

/// Everything a presenter needs to draw the map once.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    /// Player position, once known.
    pub player: Option<LatLng>,
    /// Status panel text.
    pub status: String,
    /// Shown caches ordered nearest-first.
    pub markers: Vec<MarkerFrame>,
}

impl Frame {
    /// Renders the frame as plain text lines.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.markers.len() + 2);
        match self.player {
            Some(player) => lines.push(format!("That's you! {player}")),
            None => lines.push("Waiting for a position...".to_owned()),
        }
        lines.push(self.status.clone());
        for marker in &self.markers {
            lines.push(format!(
                "There is a cache here at \"{}\". It has {} coins.",
                marker.cell, marker.coin_count
            ));
            for coin in &marker.coins {
                lines.push(format!("    {coin}"));
            }
        }
        lines
    }
}

/// Output surface that displays frames.
pub trait Presenter {
    /// Displays a single frame.
    fn present(&mut self, frame: &Frame) -> AnyResult<()>;
}

fn to_vec(position: LatLng) -> DVec2 {
    DVec2::new(position.lat(), position.lng())
}
