use std::collections::BTreeSet;

use geocoin_core::{CellCoord, Event, GridIndex, LatLng, NEIGHBORHOOD_SIZE, TILE_DEGREES};
use geocoin_world::{self as world, query, CacheWorld, Viewport, World};

fn position_of(cell: CellCoord) -> LatLng {
    // Aim for the middle of the cell so floating point never lands on an edge.
    LatLng::new(
        (f64::from(cell.i()) + 0.5) * TILE_DEGREES,
        (f64::from(cell.j()) + 0.5) * TILE_DEGREES,
    )
}

fn count_events(events: &[Event]) -> (usize, usize) {
    let shown = events
        .iter()
        .filter(|event| matches!(event, Event::CacheShown { .. }))
        .count();
    let hidden = events
        .iter()
        .filter(|event| matches!(event, Event::CacheHidden { .. }))
        .count();
    (shown, hidden)
}

#[test]
fn first_move_consults_every_cell_in_window() {
    let grid = GridIndex::new(TILE_DEGREES);
    let mut viewport = Viewport::new();
    let mut consulted = Vec::new();

    let diff = viewport.on_move(&grid, CellCoord::new(0, 0), NEIGHBORHOOD_SIZE, |cell| {
        consulted.push(cell);
        CacheWorld::should_spawn(cell)
    });

    assert_eq!(consulted.len(), 256);
    let unique: BTreeSet<CellCoord> = consulted.iter().copied().collect();
    assert_eq!(unique.len(), 256);
    for cell in &consulted {
        assert!((-8..8).contains(&cell.i()), "{cell} outside window");
        assert!((-8..8).contains(&cell.j()), "{cell} outside window");
    }

    let expected: Vec<CellCoord> = consulted
        .iter()
        .copied()
        .filter(|cell| CacheWorld::should_spawn(*cell))
        .collect();
    let shown: Vec<CellCoord> = diff.shown.iter().map(|(cell, _)| *cell).collect();
    assert_eq!(shown, expected);
    assert!(diff.hidden.is_empty());
}

#[test]
fn repeated_move_to_same_cell_is_idempotent() {
    let mut world = World::new();
    let position = position_of(CellCoord::new(0, 0));

    let mut first = Vec::new();
    world::apply(
        &mut world,
        geocoin_core::Command::MoveTo { position },
        &mut first,
    );
    let mut second = Vec::new();
    world::apply(
        &mut world,
        geocoin_core::Command::MoveTo { position },
        &mut second,
    );

    assert_eq!(count_events(&second), (0, 0));
    assert_eq!(
        query::viewport(&world).len(),
        count_events(&first).0,
        "shown set should match first move"
    );
}

#[test]
fn materialized_cells_match_spawn_test_only() {
    let mut world = World::with_home(LatLng::new(0.0, 0.0));
    let mut events = Vec::new();
    world.move_to(position_of(CellCoord::new(0, 0)), &mut events);

    for (cell, coins) in query::caches(&world).iter() {
        assert!(CacheWorld::should_spawn(cell), "{cell} is not a cache site");
        assert_eq!(coins.len(), geocoin_world::initial_coin_count(cell) as usize);
    }
    assert_eq!(query::caches(&world).len(), query::viewport(&world).len());
}

#[test]
fn moving_away_hides_but_keeps_coin_data() {
    let mut world = World::new();
    let mut events = Vec::new();
    world.move_to(position_of(CellCoord::new(0, 0)), &mut events);
    let shown_before = query::shown_caches(&world);
    assert!(
        !shown_before.is_empty(),
        "expected at least one cache near the origin"
    );
    let (cell, _) = shown_before[0];
    let taken = world.take_any(cell).ok();

    events.clear();
    world.move_to(position_of(CellCoord::new(1_000, 1_000)), &mut events);

    let (_, hidden) = count_events(&events);
    assert_eq!(hidden, shown_before.len());
    assert!(!query::viewport(&world).is_shown(cell));
    let remaining = query::cache(&world, cell)
        .expect("data survives hiding")
        .to_vec();
    if let Some(coin) = taken {
        assert!(!remaining.contains(&coin));
        assert_eq!(query::inventory(&world), &[coin]);
    }

    events.clear();
    world.move_to(position_of(CellCoord::new(0, 0)), &mut events);
    assert!(query::viewport(&world).is_shown(cell));
    assert_eq!(query::cache(&world, cell), Some(remaining.as_slice()));
    assert!(events.contains(&Event::CacheShown {
        cell,
        marker: query::viewport(&world).marker(cell).expect("marker"),
        coins: remaining.len(),
    }));
}

#[test]
fn one_step_shifts_window_by_a_single_row() {
    let grid = GridIndex::new(1.0);
    let mut viewport = Viewport::new();
    let _ = viewport.on_move(&grid, CellCoord::new(0, 0), 2, |_| true);

    let diff = viewport.on_move(&grid, CellCoord::new(1, 0), 2, |_| true);

    let hidden: BTreeSet<CellCoord> = diff.hidden.iter().map(|(cell, _)| *cell).collect();
    let shown: BTreeSet<CellCoord> = diff.shown.iter().map(|(cell, _)| *cell).collect();
    let expected_hidden: BTreeSet<CellCoord> = (-2..2).map(|j| CellCoord::new(-2, j)).collect();
    let expected_shown: BTreeSet<CellCoord> = (-2..2).map(|j| CellCoord::new(2, j)).collect();
    assert_eq!(hidden, expected_hidden);
    assert_eq!(shown, expected_shown);
}
