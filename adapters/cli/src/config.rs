//! Startup settings merged from the optional TOML file and command-line flags.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use clap::Parser;
use geocoin_core::{LatLng, HOME};
use geocoin_system_movement::DEFAULT_POLL_INTERVAL;
use serde::Deserialize;

const DEFAULT_DATA_DIR: &str = "geocoin-data";

/// Command-line arguments accepted by the binary.
#[derive(Debug, Default, Parser)]
#[command(
    name = "geocoin",
    about = "Collect coins from caches scattered across the world grid."
)]
pub(crate) struct Args {
    /// TOML file providing defaults for the options below.
    #[arg(long)]
    pub(crate) config: Option<PathBuf>,
    /// Directory holding the saved caches and inventory.
    #[arg(long)]
    pub(crate) data_dir: Option<PathBuf>,
    /// Latitude the player starts at and returns to on reset.
    #[arg(long, allow_hyphen_values = true)]
    pub(crate) home_lat: Option<f64>,
    /// Longitude the player starts at and returns to on reset.
    #[arg(long, allow_hyphen_values = true)]
    pub(crate) home_lng: Option<f64>,
    /// Milliseconds between position fixes while following the sensor.
    #[arg(long)]
    pub(crate) follow_interval_ms: Option<u64>,
    /// File of `lat,lng` lines replayed as sensor fixes.
    #[arg(long)]
    pub(crate) track: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    data_dir: Option<PathBuf>,
    home_lat: Option<f64>,
    home_lng: Option<f64>,
    follow_interval_ms: Option<u64>,
    track: Option<PathBuf>,
}

/// Fully resolved settings.
#[derive(Debug, PartialEq)]
pub(crate) struct Settings {
    pub(crate) data_dir: PathBuf,
    pub(crate) home: LatLng,
    pub(crate) follow_interval: Duration,
    pub(crate) track: Option<PathBuf>,
}

impl Settings {
    /// Resolves settings, letting flags override the config file.
    pub(crate) fn resolve(args: &Args) -> Result<Self> {
        let file = match &args.config {
            Some(path) => read_config(path)?,
            None => FileConfig::default(),
        };

        let home = LatLng::new(
            args.home_lat.or(file.home_lat).unwrap_or(HOME.lat()),
            args.home_lng.or(file.home_lng).unwrap_or(HOME.lng()),
        );
        let follow_interval = args
            .follow_interval_ms
            .or(file.follow_interval_ms)
            .map_or(DEFAULT_POLL_INTERVAL, Duration::from_millis);

        Ok(Self {
            data_dir: args
                .data_dir
                .clone()
                .or(file.data_dir)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
            home,
            follow_interval,
            track: args.track.clone().or(file.track),
        })
    }
}

fn read_config(path: &Path) -> Result<FileConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("failed to parse config {}", path.display()))
}
