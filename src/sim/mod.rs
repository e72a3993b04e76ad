//! Deterministic simulation module
//!
//! Lane traversal, drifting gaps, patrolling obstacles and player collision.
//! This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod config;
pub mod gap;
pub mod lane;
pub mod motion;
pub mod obstacle;
pub mod player;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{Aabb, head_block, is_crushed, landing_lane, pressing_levels};
pub use config::{ConfigError, LevelConfig, Physics};
pub use gap::{GapCarrier, GapField};
pub use lane::{Lane, LaneTable};
pub use motion::{Bias, BoundaryEvent, Heading, LaneMotion, LaneTraveler, Sweep};
pub use obstacle::{Obstacle, ObstacleKind};
pub use player::{Player, VerticalContact};
pub use spawn::{Placement, SpawnPolicy};
pub use state::{GapView, ObstacleView, World};
pub use tick::{TickInput, TickOutcome, tick};
