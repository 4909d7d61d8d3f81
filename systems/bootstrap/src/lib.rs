#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure bootstrap system that prepares the Geocoin experience.

use geocoin_core::Command;
use geocoin_world::{query, World};

/// Produces data required to greet the player and place them on the map.
#[derive(Debug, Default)]
pub struct Bootstrap;

impl Bootstrap {
    /// Derives the banner that should be shown when the experience starts.
    #[must_use]
    pub fn welcome_banner<'world>(&self, world: &'world World) -> &'world str {
        query::welcome_banner(world)
    }

    /// Emits the commands that materialize the caches around the player.
    pub fn initial_commands(&self, world: &World, out: &mut Vec<Command>) {
        out.push(Command::MoveTo {
            position: query::home(world),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geocoin_core::{LatLng, WELCOME_BANNER};

    #[test]
    fn greets_with_canonical_banner() {
        let world = World::new();
        assert_eq!(Bootstrap.welcome_banner(&world), WELCOME_BANNER);
    }

    #[test]
    fn first_command_moves_player_to_home() {
        let home = LatLng::new(1.0, 2.0);
        let world = World::with_home(home);
        let mut commands = Vec::new();
        Bootstrap.initial_commands(&world, &mut commands);
        assert_eq!(commands, vec![Command::MoveTo { position: home }]);
    }
}
