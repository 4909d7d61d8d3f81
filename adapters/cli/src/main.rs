#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs the Geocoin experience.

mod config;
mod repl;
mod session;
mod track;

use std::io::{self, Write};

use anyhow::Result;
use clap::Parser;
use geocoin_core::TILE_DEGREES;
use geocoin_rendering::{Frame, Presenter};
use geocoin_storage::{FileStore, Gateway};
use geocoin_system_movement::{Config, Movement};

use crate::{
    config::{Args, Settings},
    session::Session,
};

/// Writes frames to standard output.
struct StdoutPresenter;

impl Presenter for StdoutPresenter {
    fn present(&mut self, frame: &Frame) -> Result<()> {
        let mut out = io::stdout().lock();
        for line in frame.lines() {
            writeln!(out, "{line}")?;
        }
        out.flush()?;
        Ok(())
    }
}

/// Entry point for the Geocoin command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let settings = Settings::resolve(&args)?;
    log::info!("storing state in {}", settings.data_dir.display());

    let sensor = track::open(settings.track.as_deref())?;
    let movement = Movement::new(Config::new(TILE_DEGREES, settings.follow_interval));
    let gateway = Gateway::new(FileStore::new(&settings.data_dir));
    let mut session = Session::start(settings.home, gateway, movement, sensor)?;

    let mut presenter = StdoutPresenter;
    println!("{}", session.banner());
    println!("Type `help` for the list of commands.");
    presenter.present(&session.frame())?;

    repl::run(&mut session, io::stdin().lock(), &mut presenter)?;
    let _ = session.shutdown()?;
    Ok(())
}
