//! Conversion between geographic positions and discrete grid cells.

use std::ops::Range;

use crate::{CellCoord, LatLng};

/// Offsets covered by a neighborhood of the provided radius along each axis.
///
/// The window is half-open: it reaches `radius` cells before the center but
/// only `radius - 1` cells after it. Saved positions were recorded against
/// this exact window, so it must not be widened to a symmetric one.
#[must_use]
pub const fn window_offsets(radius: i32) -> Range<i32> {
    -radius..radius
}

/// Maps continuous positions onto a grid of fixed-size square cells.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridIndex {
    cell_size: f64,
}

impl GridIndex {
    /// Creates a grid with the provided cell side length in degrees.
    #[must_use]
    pub const fn new(cell_size: f64) -> Self {
        Self { cell_size }
    }

    /// Cell containing the provided position.
    ///
    /// Values outside the representable range saturate at the grid edge.
    #[must_use]
    pub fn cell_of(&self, position: LatLng) -> CellCoord {
        let i = (position.lat() / self.cell_size).floor() as i32;
        let j = (position.lng() / self.cell_size).floor() as i32;
        CellCoord::new(i, j)
    }

    /// Enumerates the neighborhood around `center`, row by row.
    #[must_use]
    pub fn neighborhood(&self, center: CellCoord, radius: i32) -> Vec<CellCoord> {
        let offsets = window_offsets(radius);
        let mut cells = Vec::with_capacity(offsets.len() * offsets.len());
        for di in offsets.clone() {
            for dj in offsets.clone() {
                cells.push(center.offset(di, dj));
            }
        }
        cells
    }

    /// Reports whether `cell` lies within the neighborhood around `center`.
    #[must_use]
    pub fn in_neighborhood(&self, center: CellCoord, radius: i32, cell: CellCoord) -> bool {
        let offsets = window_offsets(radius);
        let di = i64::from(cell.i()) - i64::from(center.i());
        let dj = i64::from(cell.j()) - i64::from(center.j());
        let (start, end) = (i64::from(offsets.start), i64::from(offsets.end));
        (start..end).contains(&di) && (start..end).contains(&dj)
    }

    /// Geographic rectangle covered by the cell.
    #[must_use]
    pub fn cell_bounds(&self, cell: CellCoord) -> CellBounds {
        let size = self.cell_size;
        CellBounds {
            south_west: LatLng::new(f64::from(cell.i()) * size, f64::from(cell.j()) * size),
            north_east: LatLng::new(
                (f64::from(cell.i()) + 1.0) * size,
                (f64::from(cell.j()) + 1.0) * size,
            ),
        }
    }
}

/// Axis-aligned geographic rectangle covered by a single cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellBounds {
    south_west: LatLng,
    north_east: LatLng,
}

impl CellBounds {
    /// Corner with the smallest latitude and longitude.
    #[must_use]
    pub const fn south_west(&self) -> LatLng {
        self.south_west
    }

    /// Corner with the largest latitude and longitude.
    #[must_use]
    pub const fn north_east(&self) -> LatLng {
        self.north_east
    }
}
