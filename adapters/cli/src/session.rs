//! Wires the world, its systems and the persistence gateway together.

use anyhow::{Context, Result};
use geocoin_core::{CellCoord, Command, Event, LatLng};
use geocoin_rendering::{Frame, MapView, PopupState};
use geocoin_storage::{should_persist, Gateway, StateStore};
use geocoin_system_bootstrap::Bootstrap;
use geocoin_system_movement::{Input, Movement, PositionSource};
use geocoin_system_scoring::Scoring;
use geocoin_world::{self as world, query, World};

/// Live game state owned by the command-line adapter.
pub(crate) struct Session<S> {
    world: World,
    gateway: Gateway<S>,
    movement: Movement,
    scoring: Scoring,
    map: MapView,
    sensor: Box<dyn PositionSource>,
}

impl<S: StateStore> Session<S> {
    /// Restores persisted state and places the player at `home`.
    pub(crate) fn start(
        home: LatLng,
        gateway: Gateway<S>,
        movement: Movement,
        sensor: Box<dyn PositionSource>,
    ) -> Result<Self> {
        let snapshot = gateway.load().context("failed to load saved state")?;
        let world = World::from_snapshot(home, snapshot);
        let scoring = Scoring::new(query::total_inventory(&world));
        let map = MapView::new(*query::grid(&world));
        let mut session = Self {
            world,
            gateway,
            movement,
            scoring,
            map,
            sensor,
        };

        let mut commands = Vec::new();
        Bootstrap.initial_commands(&session.world, &mut commands);
        let _ = session.dispatch(commands);
        Ok(session)
    }

    /// Banner greeting the player.
    pub(crate) fn banner(&self) -> &str {
        Bootstrap.welcome_banner(&self.world)
    }

    /// Applies commands in order and returns every event they produced.
    pub(crate) fn dispatch(&mut self, commands: Vec<Command>) -> Vec<Event> {
        let mut events = Vec::new();
        for command in commands {
            world::apply(&mut self.world, command, &mut events);
        }
        self.scoring.handle(&events);
        self.map.handle(&events);
        if should_persist(&events) {
            self.persist();
        }
        events
    }

    /// Feeds player controls through the movement system.
    pub(crate) fn control(&mut self, inputs: &[Input]) -> Vec<Event> {
        let mut commands = Vec::new();
        self.movement.handle(
            inputs,
            query::player_position(&self.world),
            self.sensor.as_mut(),
            &mut commands,
        );
        self.dispatch(commands)
    }

    /// Reports whether sensor follow mode is active.
    pub(crate) fn is_following(&self) -> bool {
        self.movement.is_following()
    }

    /// Forgets every cache and held coin, on disk and in memory.
    pub(crate) fn reset(&mut self) -> Vec<Event> {
        if let Err(error) = self.gateway.clear() {
            log::error!("failed to clear saved state: {error}");
        }
        self.dispatch(vec![Command::ResetAll])
    }

    /// Opens or closes the popup of a shown cache.
    pub(crate) fn toggle_popup(&mut self, cell: CellCoord) -> Option<PopupState> {
        self.map.toggle_popup(cell)
    }

    /// Reports whether a marker is currently shown for `cell`.
    pub(crate) fn is_shown(&self, cell: CellCoord) -> bool {
        self.map.marker_at(cell).is_some()
    }

    pub(crate) fn world(&self) -> &World {
        &self.world
    }

    pub(crate) fn frame(&self) -> Frame {
        self.map.frame(
            |cell| query::cache(&self.world, cell),
            &self.scoring.status_text(),
        )
    }

    /// Persists the final state and hands back the gateway.
    pub(crate) fn shutdown(mut self) -> Result<Gateway<S>> {
        let snapshot = self.world.teardown();
        self.gateway
            .save(&snapshot)
            .context("failed to save state on exit")?;
        Ok(self.gateway)
    }

    fn persist(&mut self) {
        if let Err(error) = self.gateway.save(&query::snapshot(&self.world)) {
            log::error!("failed to save state: {error}");
        }
    }
}
