#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Scoring system that keeps the status panel in step with the inventory.

use geocoin_core::Event;

/// Pure system that counts the coins the player currently holds.
#[derive(Debug, Default)]
pub struct Scoring {
    points: usize,
}

impl Scoring {
    /// Creates a scoring system seeded with the inventory size at startup.
    #[must_use]
    pub const fn new(points: usize) -> Self {
        Self { points }
    }

    /// Consumes world events, adjusting the score for every completed transfer.
    pub fn handle(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::CoinTaken { .. } => self.points = self.points.saturating_add(1),
                Event::CoinGiven { .. } => self.points = self.points.saturating_sub(1),
                Event::WorldReset => self.points = 0,
                _ => {}
            }
        }
    }

    /// Number of coins currently held by the player.
    #[must_use]
    pub const fn points(&self) -> usize {
        self.points
    }

    /// Text shown in the status panel.
    #[must_use]
    pub fn status_text(&self) -> String {
        if self.points == 0 {
            "No points yet...".to_owned()
        } else {
            format!("{} points accumulated", self.points)
        }
    }
}
