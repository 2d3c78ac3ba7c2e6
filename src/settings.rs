//! Simulation settings
//!
//! Read from a JSON file by the native runner; every field has a default so
//! partial files are fine.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Starting terrain, in cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArenaLayout {
    /// Distance from the origin to each side wall (also the wall height)
    pub reach: i64,
    /// Wall and floor thickness
    pub wall_size: i64,
}

impl Default for ArenaLayout {
    fn default() -> Self {
        Self {
            reach: 200,
            wall_size: 30,
        }
    }
}

/// Simulation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// RNG seed
    pub seed: u64,
    /// Creatures spawned when the world is created
    pub initial_creatures: u32,
    /// Target ticks per second for the frame driver
    pub frame_rate: u32,
    /// Paint the starting walls and floor
    pub build_arena: bool,
    pub arena: ArenaLayout,
    /// Paint brush half-width in cells (the brush is `2r + 1` wide)
    pub brush_radius: i64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 0,
            initial_creatures: 2,
            frame_rate: 60,
            build_arena: true,
            arena: ArenaLayout::default(),
            brush_radius: 3,
        }
    }
}

impl Settings {
    /// Duration of one tick in time units (milliseconds)
    pub fn tick_duration(&self) -> f64 {
        1000.0 / self.frame_rate.max(1) as f64
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    return settings;
                }
                Err(err) => log::warn!("Ignoring malformed settings {}: {}", path.display(), err),
            },
            Err(err) => log::warn!("Could not read settings {}: {}", path.display(), err),
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Write settings as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("Settings saved to {}", path.as_ref().display());
        Ok(())
    }
}
