//! Runner settings and preferences
//!
//! Loaded from a JSON file next to the leaderboard. Missing fields take
//! their defaults, so older files keep working.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::FPS;
use crate::persistence::{PersistError, read_json, write_json};
use crate::session::START_LIVES;

/// Runner settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Seed for level layout and spawns
    pub seed: u64,
    /// Ticks to simulate before stopping a headless run
    pub tick_budget: u64,
    /// Lives at the start of a run
    pub lives: u32,
    /// Let the autopilot drive the player
    pub autopilot: bool,
    /// Name recorded on the leaderboard
    pub player_name: String,
    pub leaderboard_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 12345,
            // Five minutes of play
            tick_budget: 5 * 60 * FPS as u64,
            lives: START_LIVES,
            autopilot: true,
            player_name: String::new(),
            leaderboard_path: PathBuf::from("leaderboard.json"),
        }
    }
}

impl Settings {
    /// Load settings from `path`, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match read_json::<Settings>(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) if e.is_not_found() => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Ignoring settings file: {}", e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), PersistError> {
        write_json(path, self)?;
        log::info!("Settings saved");
        Ok(())
    }

    /// Lives clamped to at least one
    pub fn effective_lives(&self) -> u32 {
        self.lives.max(1)
    }
}
