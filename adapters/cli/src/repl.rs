//! Line-oriented player controls.

use std::{io::BufRead, time::Duration};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use geocoin_core::{CellCoord, Coin, Command, Direction, Event, LatLng};
use geocoin_rendering::Presenter;
use geocoin_storage::StateStore;
use geocoin_system_movement::Input;
use geocoin_world::query;

use crate::session::Session;

/// A single line typed by the player.
#[derive(Debug, Parser)]
#[command(name = "geocoin", no_binary_name = true, disable_version_flag = true)]
pub(crate) struct Line {
    #[command(subcommand)]
    pub(crate) action: Action,
}

#[derive(Debug, PartialEq, Subcommand)]
pub(crate) enum Action {
    /// Step one cell north.
    #[command(alias = "n")]
    North,
    /// Step one cell south.
    #[command(alias = "s")]
    South,
    /// Step one cell east.
    #[command(alias = "e")]
    East,
    /// Step one cell west.
    #[command(alias = "w")]
    West,
    /// Jump straight to a position.
    #[command(allow_negative_numbers = true)]
    Move { lat: f64, lng: f64 },
    /// Toggle following the position sensor.
    Follow,
    /// Let time pass so the sensor can be polled.
    Wait { millis: u64 },
    /// Collect a coin from a shown cache; the most recent one by default.
    Take {
        #[arg(allow_hyphen_values = true)]
        cell: CellCoord,
        #[arg(allow_hyphen_values = true)]
        coin: Option<Coin>,
    },
    /// Deposit a held coin into a shown cache; the most recent one by default.
    Give {
        #[arg(allow_hyphen_values = true)]
        cell: CellCoord,
        #[arg(allow_hyphen_values = true)]
        coin: Option<Coin>,
    },
    /// Open or close the popup of a shown cache.
    Open {
        #[arg(allow_hyphen_values = true)]
        cell: CellCoord,
    },
    /// List the coins you hold.
    Inventory,
    /// Show the points panel.
    Status,
    /// Redraw the map.
    Map,
    /// Forget every cache and held coin.
    Reset {
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
    /// Save and leave.
    #[command(alias = "exit")]
    Quit,
}

/// What the loop should do after an action.
#[derive(Debug, PartialEq)]
pub(crate) enum Outcome {
    Redraw(Vec<Event>),
    Say(String),
    ConfirmReset,
    Quit,
}

pub(crate) fn execute<S: StateStore>(session: &mut Session<S>, action: Action) -> Outcome {
    match action {
        Action::North => nudge(session, Direction::North),
        Action::South => nudge(session, Direction::South),
        Action::East => nudge(session, Direction::East),
        Action::West => nudge(session, Direction::West),
        Action::Move { lat, lng } => Outcome::Redraw(session.dispatch(vec![Command::MoveTo {
            position: LatLng::new(lat, lng),
        }])),
        Action::Follow => {
            let events = session.control(&[Input::ToggleFollow]);
            if events.is_empty() {
                let state = if session.is_following() { "on" } else { "off" };
                Outcome::Say(format!("Sensor follow is {state}."))
            } else {
                Outcome::Redraw(events)
            }
        }
        Action::Wait { millis } => {
            Outcome::Redraw(session.control(&[Input::Elapsed(Duration::from_millis(millis))]))
        }
        Action::Take { cell, coin } => {
            let command = match coin {
                Some(coin) => Command::Take { coin, cell },
                None => Command::TakeAny { cell },
            };
            transfer(session, cell, command)
        }
        Action::Give { cell, coin } => {
            let command = match coin {
                Some(coin) => Command::Give { coin, cell },
                None => Command::GiveAny { cell },
            };
            transfer(session, cell, command)
        }
        Action::Open { cell } => match session.toggle_popup(cell) {
            Some(_) => Outcome::Redraw(Vec::new()),
            None => not_shown(cell),
        },
        Action::Inventory => Outcome::Say(describe_inventory(query::inventory(session.world()))),
        Action::Status => Outcome::Say(session.frame().status),
        Action::Map => Outcome::Redraw(Vec::new()),
        Action::Reset { yes: true } => Outcome::Redraw(session.reset()),
        Action::Reset { yes: false } => Outcome::ConfirmReset,
        Action::Quit => Outcome::Quit,
    }
}

/// Reads lines until input ends or the player quits.
pub(crate) fn run<S, R, P>(session: &mut Session<S>, input: R, presenter: &mut P) -> Result<()>
where
    S: StateStore,
    R: BufRead,
    P: Presenter,
{
    let mut confirming_reset = false;
    for line in input.lines() {
        let line = line.context("failed to read command")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let outcome = if std::mem::take(&mut confirming_reset) {
            if line.eq_ignore_ascii_case("yes") {
                Outcome::Redraw(session.reset())
            } else {
                Outcome::Say("Reset cancelled.".to_owned())
            }
        } else {
            match Line::try_parse_from(line.split_whitespace()) {
                Ok(parsed) => execute(session, parsed.action),
                Err(error) => Outcome::Say(error.to_string()),
            }
        };

        match outcome {
            Outcome::Redraw(events) => {
                for note in rejections(&events) {
                    println!("{note}");
                }
                presenter.present(&session.frame())?;
            }
            Outcome::Say(text) => println!("{}", text.trim_end()),
            Outcome::ConfirmReset => {
                println!("This erases every cache and coin you hold. Type `yes` to confirm.");
                confirming_reset = true;
            }
            Outcome::Quit => break,
        }
    }
    Ok(())
}

fn nudge<S: StateStore>(session: &mut Session<S>, direction: Direction) -> Outcome {
    Outcome::Redraw(session.control(&[Input::Nudge(direction)]))
}

fn transfer<S: StateStore>(session: &mut Session<S>, cell: CellCoord, command: Command) -> Outcome {
    if !session.is_shown(cell) {
        return not_shown(cell);
    }
    Outcome::Redraw(session.dispatch(vec![command]))
}

fn not_shown(cell: CellCoord) -> Outcome {
    Outcome::Say(format!("No cache is shown at {cell}."))
}

fn describe_inventory(coins: &[Coin]) -> String {
    if coins.is_empty() {
        return "You hold no coins.".to_owned();
    }
    let mut text = format!("You hold {} coins:", coins.len());
    for coin in coins {
        text.push_str(&format!("\n    {coin}"));
    }
    text
}

fn rejections(events: &[Event]) -> impl Iterator<Item = String> + '_ {
    events.iter().filter_map(|event| match event {
        Event::TransferRejected { cell, reason } => {
            Some(format!("Nothing happened at {cell}: {reason}."))
        }
        _ => None,
    })
}
