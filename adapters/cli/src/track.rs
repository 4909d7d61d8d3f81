//! Position sources backing sensor follow mode.

use std::{collections::VecDeque, fs, path::Path};

use anyhow::{bail, Context, Result};
use geocoin_core::LatLng;
use geocoin_system_movement::PositionSource;

/// Sensor that never obtains a fix.
#[derive(Debug, Default)]
pub(crate) struct NoSensor;

impl PositionSource for NoSensor {
    fn poll(&mut self) -> Option<LatLng> {
        log::warn!("no position source configured; pass --track to follow a recorded path");
        None
    }
}

/// Replays recorded fixes, holding the last one once the track runs out.
#[derive(Debug)]
pub(crate) struct Track {
    fixes: VecDeque<LatLng>,
}

impl Track {
    pub(crate) fn parse(text: &str) -> Result<Self> {
        let mut fixes = VecDeque::new();
        for (number, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((lat, lng)) = line.split_once(',') else {
                bail!("line {}: expected `lat,lng`, found `{line}`", number + 1);
            };
            let lat = lat
                .trim()
                .parse::<f64>()
                .with_context(|| format!("line {}: invalid latitude", number + 1))?;
            let lng = lng
                .trim()
                .parse::<f64>()
                .with_context(|| format!("line {}: invalid longitude", number + 1))?;
            fixes.push_back(LatLng::new(lat, lng));
        }
        Ok(Self { fixes })
    }
}

impl PositionSource for Track {
    fn poll(&mut self) -> Option<LatLng> {
        if self.fixes.len() > 1 {
            self.fixes.pop_front()
        } else {
            self.fixes.front().copied()
        }
    }
}

/// Builds the position source for the optional track file.
pub(crate) fn open(path: Option<&Path>) -> Result<Box<dyn PositionSource>> {
    let Some(path) = path else {
        return Ok(Box::new(NoSensor));
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read track {}", path.display()))?;
    let track = Track::parse(&text).with_context(|| format!("in track {}", path.display()))?;
    log::info!("loaded {} fixes from {}", track.fixes.len(), path.display());
    Ok(Box::new(track))
}
