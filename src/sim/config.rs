//! Construction-time level configuration
//!
//! Supplied by the level-setup collaborator. The simulation stores it but
//! never generates it, and refuses to build from an invalid one.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Reasons a `LevelConfig` is rejected
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("field width must be positive and finite, got {0}")]
    FieldWidth(f32),
    #[error("lane table is empty")]
    EmptyLaneTable,
    #[error("lane {index} has non-finite y {y}")]
    LaneNotFinite { index: usize, y: f32 },
    #[error("lane {index} (y={y}) is not above lane {below} (y={below_y})")]
    LaneOrder {
        index: usize,
        y: f32,
        below: usize,
        below_y: f32,
    },
    #[error("lane thickness must be positive, got {0}")]
    LaneThickness(f32),
    #[error("gap width range {min}..={max} is invalid")]
    GapWidthRange { min: f32, max: f32 },
    #[error("gap width {width} must be smaller than field width {field}")]
    GapTooWide { width: f32, field: f32 },
    #[error("{what} must be finite, got {value}")]
    NotFinite { what: &'static str, value: f32 },
    #[error("{what} speed must be non-negative and finite, got {value}")]
    Speed { what: &'static str, value: f32 },
    #[error("player size {0} must be positive")]
    PlayerSize(Vec2),
    #[error("lane {lane} is outside the {count}-lane table")]
    LaneOutOfRange { lane: usize, count: usize },
}

/// Player physics constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Physics {
    /// Added to vertical velocity every tick (positive is downward)
    pub gravity: f32,
    /// Vertical velocity set by a jump (negative is upward)
    pub jump_strength: f32,
    /// Horizontal step per tick of held movement
    pub move_speed: f32,
    /// Slack added to |velocity| when searching for a lane to land on
    pub landing_tolerance: f32,
}

impl Default for Physics {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            jump_strength: JUMP_STRENGTH,
            move_speed: MOVE_SPEED,
            landing_tolerance: LANDING_TOLERANCE,
        }
    }
}

/// Everything needed to build a level's `World`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub field_width: f32,
    pub floor_y: f32,
    /// Lane y-coordinates; index 0 is the bottom lane
    pub lane_ys: Vec<f32>,
    pub lane_thickness: f32,
    pub gap_count: usize,
    pub gap_width_min: f32,
    pub gap_width_max: f32,
    /// Horizontal distance a gap carrier covers per tick
    pub gap_speed: f32,
    pub obstacle_count: usize,
    /// Horizontal distance an obstacle covers per tick
    pub obstacle_speed: f32,
    pub player_size: Vec2,
    /// Top-left corner the player spawns (and respawns) at
    pub player_spawn: Vec2,
    pub physics: Physics,
    /// Invulnerability granted when the level starts
    pub start_invulnerable_ticks: u32,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self::for_speed(1.5)
    }
}

impl LevelConfig {
    /// Standard five-lane layout at the given base speed
    pub fn for_speed(base_speed: f32) -> Self {
        Self {
            field_width: FIELD_WIDTH,
            floor_y: FLOOR_Y,
            lane_ys: LANE_YS.to_vec(),
            lane_thickness: LANE_THICKNESS,
            gap_count: LANE_YS.len(),
            gap_width_min: GAP_WIDTH_MIN,
            gap_width_max: GAP_WIDTH_MAX,
            gap_speed: base_speed,
            obstacle_count: 0,
            obstacle_speed: base_speed * OBSTACLE_SPEED_FACTOR,
            player_size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            player_spawn: Vec2::new(PLAYER_SPAWN_X, FLOOR_Y - PLAYER_HEIGHT),
            physics: Physics::default(),
            start_invulnerable_ticks: 2 * FPS,
        }
    }

    /// Reject configurations that would produce undefined motion
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.field_width.is_finite() && self.field_width > 0.0) {
            return Err(ConfigError::FieldWidth(self.field_width));
        }
        if self.lane_ys.is_empty() {
            return Err(ConfigError::EmptyLaneTable);
        }
        for (index, &y) in self.lane_ys.iter().enumerate() {
            if !y.is_finite() {
                return Err(ConfigError::LaneNotFinite { index, y });
            }
            // Screen y grows downward, so higher lanes have smaller y
            if index > 0 && y >= self.lane_ys[index - 1] {
                return Err(ConfigError::LaneOrder {
                    index,
                    y,
                    below: index - 1,
                    below_y: self.lane_ys[index - 1],
                });
            }
        }
        if !(self.lane_thickness.is_finite() && self.lane_thickness > 0.0) {
            return Err(ConfigError::LaneThickness(self.lane_thickness));
        }
        if !(self.gap_width_min > 0.0 && self.gap_width_min <= self.gap_width_max) {
            return Err(ConfigError::GapWidthRange {
                min: self.gap_width_min,
                max: self.gap_width_max,
            });
        }
        if self.gap_width_max >= self.field_width {
            return Err(ConfigError::GapTooWide {
                width: self.gap_width_max,
                field: self.field_width,
            });
        }
        check_speed("gap", self.gap_speed)?;
        check_speed("obstacle", self.obstacle_speed)?;
        check_speed("move", self.physics.move_speed)?;
        let size = self.player_size;
        if !(size.is_finite() && size.x > 0.0 && size.y > 0.0) {
            return Err(ConfigError::PlayerSize(self.player_size));
        }
        check_finite("floor y", self.floor_y)?;
        check_finite("player spawn x", self.player_spawn.x)?;
        check_finite("player spawn y", self.player_spawn.y)?;
        check_finite("gravity", self.physics.gravity)?;
        check_finite("jump strength", self.physics.jump_strength)?;
        check_finite("landing tolerance", self.physics.landing_tolerance)?;
        Ok(())
    }

    pub fn lane_count(&self) -> usize {
        self.lane_ys.len()
    }
}

fn check_speed(what: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Speed { what, value })
    }
}

fn check_finite(what: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotFinite { what, value })
    }
}
