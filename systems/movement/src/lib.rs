#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Movement system that turns player controls and sensor fixes into moves.

use std::time::Duration;

use geocoin_core::{Command, Direction, LatLng, TILE_DEGREES};

/// Default cadence at which sensor follow mode polls for a new position.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Supplies the player's real-world position when follow mode is active.
pub trait PositionSource {
    /// Returns the latest known position, if the sensor has a fix.
    fn poll(&mut self) -> Option<LatLng>;
}

/// Player controls consumed by the movement system.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Input {
    /// Moves the player one fixed step in the provided direction.
    Nudge(Direction),
    /// Switches sensor follow mode on or off.
    ToggleFollow,
    /// Reports that wall-clock time elapsed.
    Elapsed(Duration),
}

/// Configuration parameters required to construct the movement system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    step: f64,
    poll_interval: Duration,
}

impl Config {
    /// Creates a new configuration using the provided nudge step and poll cadence.
    #[must_use]
    pub const fn new(step: f64, poll_interval: Duration) -> Self {
        Self {
            step,
            poll_interval,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(TILE_DEGREES, DEFAULT_POLL_INTERVAL)
    }
}

/// Pure system that emits [`Command::MoveTo`] in response to player input.
#[derive(Debug)]
pub struct Movement {
    step: f64,
    poll_interval: Duration,
    accumulator: Duration,
    following: bool,
}

impl Movement {
    /// Creates a new movement system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            step: config.step,
            poll_interval: config.poll_interval,
            accumulator: Duration::ZERO,
            following: false,
        }
    }

    /// Reports whether sensor follow mode is active.
    #[must_use]
    pub fn is_following(&self) -> bool {
        self.following
    }

    /// Consumes inputs in order and emits the resulting move commands.
    ///
    /// `current` is the player's position before the first input. When several
    /// poll intervals elapse within one call only the latest sensor fix is
    /// used, since it supersedes the ones before it.
    pub fn handle<S>(
        &mut self,
        inputs: &[Input],
        current: LatLng,
        source: &mut S,
        out: &mut Vec<Command>,
    ) where
        S: PositionSource + ?Sized,
    {
        let mut position = current;
        for input in inputs {
            let next = match *input {
                Input::Nudge(direction) => Some(self.nudged(position, direction)),
                Input::ToggleFollow => self.toggle_follow(source),
                Input::Elapsed(dt) => self.advance_clock(dt, source),
            };

            if let Some(next) = next {
                position = next;
                out.push(Command::MoveTo { position });
            }
        }
    }

    fn nudged(&self, position: LatLng, direction: Direction) -> LatLng {
        match direction {
            Direction::North => position.offset(self.step, 0.0),
            Direction::South => position.offset(-self.step, 0.0),
            Direction::East => position.offset(0.0, self.step),
            Direction::West => position.offset(0.0, -self.step),
        }
    }

    fn toggle_follow<S>(&mut self, source: &mut S) -> Option<LatLng>
    where
        S: PositionSource + ?Sized,
    {
        self.following = !self.following;
        self.accumulator = Duration::ZERO;
        log::info!(
            "sensor follow {}",
            if self.following { "enabled" } else { "disabled" }
        );
        if self.following {
            source.poll()
        } else {
            None
        }
    }

    fn advance_clock<S>(&mut self, dt: Duration, source: &mut S) -> Option<LatLng>
    where
        S: PositionSource + ?Sized,
    {
        if !self.following || self.poll_interval.is_zero() {
            return None;
        }

        self.accumulator = self.accumulator.saturating_add(dt);
        let mut polls = 0;
        while self.accumulator >= self.poll_interval {
            self.accumulator -= self.poll_interval;
            polls += 1;
        }

        if polls == 0 {
            return None;
        }
        let fix = source.poll();
        if fix.is_none() {
            log::debug!("sensor had no fix after {polls} poll interval(s)");
        }
        fix
    }
}

impl Default for Movement {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
