//! Tracks which cache cells are currently shown around the player.

use std::collections::BTreeMap;

use geocoin_core::{CellCoord, GridIndex, MarkerId};

/// Cells that entered or left the shown set during a single move.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ViewportDiff {
    /// Cells that left the neighborhood, with the marker they were shown under.
    pub hidden: Vec<(CellCoord, MarkerId)>,
    /// Cache cells that entered the neighborhood, with their new marker.
    pub shown: Vec<(CellCoord, MarkerId)>,
}

impl ViewportDiff {
    /// Reports whether the move changed nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hidden.is_empty() && self.shown.is_empty()
    }
}

/// Set of cache cells currently materialized to the rendering layer.
///
/// Hiding a cell only drops its marker; the coin contents live on in
/// [`CacheWorld`](crate::CacheWorld).
#[derive(Clone, Debug, Default)]
pub struct Viewport {
    shown: BTreeMap<CellCoord, MarkerId>,
    next_marker: u32,
}

impl Viewport {
    /// Creates a viewport with nothing shown.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Recomputes the shown set for a player standing in `center`.
    ///
    /// Shown cells outside the neighborhood are hidden first. Every cell in the
    /// neighborhood that is not already shown is then offered to
    /// `should_spawn`, in row order, and shown when it answers `true`.
    pub fn on_move<F>(
        &mut self,
        grid: &GridIndex,
        center: CellCoord,
        radius: i32,
        mut should_spawn: F,
    ) -> ViewportDiff
    where
        F: FnMut(CellCoord) -> bool,
    {
        let mut diff = ViewportDiff::default();

        self.shown.retain(|cell, marker| {
            let keep = grid.in_neighborhood(center, radius, *cell);
            if !keep {
                diff.hidden.push((*cell, *marker));
            }
            keep
        });

        for cell in grid.neighborhood(center, radius) {
            if self.shown.contains_key(&cell) || !should_spawn(cell) {
                continue;
            }
            let marker = self.allocate_marker();
            let _ = self.shown.insert(cell, marker);
            diff.shown.push((cell, marker));
        }

        if !diff.is_empty() {
            log::debug!(
                "viewport around {center}: {} shown, {} hidden",
                diff.shown.len(),
                diff.hidden.len()
            );
        }
        diff
    }

    /// Hides every shown cell, returning the cells that were dropped.
    pub fn hide_all(&mut self) -> Vec<(CellCoord, MarkerId)> {
        std::mem::take(&mut self.shown).into_iter().collect()
    }

    /// Reports whether the cell is currently shown.
    #[must_use]
    pub fn is_shown(&self, cell: CellCoord) -> bool {
        self.shown.contains_key(&cell)
    }

    /// Marker the cell is currently shown under.
    #[must_use]
    pub fn marker(&self, cell: CellCoord) -> Option<MarkerId> {
        self.shown.get(&cell).copied()
    }

    /// Number of shown cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shown.len()
    }

    /// Reports whether nothing is shown.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shown.is_empty()
    }

    /// Iterates over shown cells in coordinate order.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, MarkerId)> + '_ {
        self.shown.iter().map(|(cell, marker)| (*cell, *marker))
    }

    fn allocate_marker(&mut self) -> MarkerId {
        let marker = MarkerId::new(self.next_marker);
        self.next_marker = self.next_marker.wrapping_add(1);
        marker
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markers_are_never_reused() {
        let grid = GridIndex::new(1.0);
        let mut viewport = Viewport::new();
        let first = viewport.on_move(&grid, CellCoord::new(0, 0), 1, |_| true);
        let _ = viewport.on_move(&grid, CellCoord::new(50, 50), 1, |_| true);
        let second = viewport.on_move(&grid, CellCoord::new(0, 0), 1, |_| true);

        let first_markers: Vec<MarkerId> = first.shown.iter().map(|(_, m)| *m).collect();
        for (_, marker) in &second.shown {
            assert!(!first_markers.contains(marker));
        }
    }

    #[test]
    fn hide_all_empties_the_viewport() {
        let grid = GridIndex::new(1.0);
        let mut viewport = Viewport::new();
        let diff = viewport.on_move(&grid, CellCoord::new(0, 0), 2, |cell| cell.i() == 0);
        assert_eq!(diff.shown.len(), 4);

        let hidden = viewport.hide_all();
        assert_eq!(hidden.len(), 4);
        assert!(viewport.is_empty());
    }
}
