//! Jumping Jack - a lane-climbing arcade platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (lane traversal, gaps, obstacles, player collision)
//! - `session`: Lives, score and level progression wrapped around the simulation
//! - `highscores`: Leaderboard with JSON file persistence
//! - `settings`: Runner preferences loaded from JSON
//! - `persistence`: Shared JSON file I/O

pub mod highscores;
pub mod persistence;
pub mod session;
pub mod settings;
pub mod sim;

pub use highscores::Leaderboard;
pub use persistence::PersistError;
pub use session::{Autopilot, Session, SessionEvent, SessionPhase};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Simulation rate; one tick per rendered frame
    pub const FPS: u32 = 60;

    /// Play field width (all lanes share it)
    pub const FIELD_WIDTH: f32 = 800.0;
    /// Absolute floor the player stands on below the lowest lane
    pub const FLOOR_Y: f32 = 370.0;

    /// Lane y-coordinates, index 0 is the bottom lane
    pub const LANE_YS: [f32; 5] = [340.0, 280.0, 220.0, 160.0, 100.0];
    /// Vertical thickness of every lane band
    pub const LANE_THICKNESS: f32 = 3.0;

    /// Gap width range (inclusive)
    pub const GAP_WIDTH_MIN: f32 = 60.0;
    pub const GAP_WIDTH_MAX: f32 = 90.0;

    /// Player defaults
    pub const PLAYER_WIDTH: f32 = 20.0;
    pub const PLAYER_HEIGHT: f32 = 32.0;
    pub const PLAYER_SPAWN_X: f32 = 100.0;
    /// Tuned so a jump clears exactly one lane (60 px)
    pub const JUMP_STRENGTH: f32 = -11.0;
    pub const GRAVITY: f32 = 0.8;
    pub const MOVE_SPEED: f32 = 5.0;
    /// Extra slack when looking for a lane to land on
    pub const LANDING_TOLERANCE: f32 = 5.0;

    /// Obstacles move slower than gaps at the same level speed
    pub const OBSTACLE_SPEED_FACTOR: f32 = 0.8;
}

/// Wrap a horizontal coordinate into [0, width)
#[inline]
pub fn wrap_coord(x: f32, width: f32) -> f32 {
    let wrapped = x.rem_euclid(width);
    // rem_euclid can round up to `width` for tiny negative inputs
    if wrapped >= width { 0.0 } else { wrapped }
}
