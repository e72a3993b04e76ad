//! Patrolling obstacles
//!
//! Obstacles ride on top of their lane and follow the same snake pattern as
//! gap carriers, but must leave the field by a full body width before they
//! switch lanes. Touching one is always a hit.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::lane::LaneTable;
use super::motion::{Bias, BoundaryEvent, Heading, LaneMotion, LaneTraveler, Sweep};

/// Obstacle roster, in unlock order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleKind {
    Snake,
    Plane,
    Axel,
    Octopus,
    Ghost,
    Car,
    Train,
    Hunter,
    Dinosaur,
}

impl ObstacleKind {
    pub const ALL: [ObstacleKind; 9] = [
        ObstacleKind::Snake,
        ObstacleKind::Plane,
        ObstacleKind::Axel,
        ObstacleKind::Octopus,
        ObstacleKind::Ghost,
        ObstacleKind::Car,
        ObstacleKind::Train,
        ObstacleKind::Hunter,
        ObstacleKind::Dinosaur,
    ];

    /// Number of colour variants each kind ships with
    pub const VARIANTS: u8 = 6;

    /// Body size (width, height)
    pub fn size(self) -> Vec2 {
        match self {
            ObstacleKind::Snake => Vec2::new(35.0, 20.0),
            ObstacleKind::Plane => Vec2::new(50.0, 20.0),
            ObstacleKind::Axel => Vec2::new(25.0, 25.0),
            ObstacleKind::Octopus => Vec2::new(30.0, 25.0),
            ObstacleKind::Ghost => Vec2::new(28.0, 28.0),
            ObstacleKind::Car => Vec2::new(45.0, 18.0),
            ObstacleKind::Train => Vec2::new(55.0, 22.0),
            ObstacleKind::Hunter => Vec2::new(22.0, 30.0),
            ObstacleKind::Dinosaur => Vec2::new(40.0, 28.0),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ObstacleKind::Snake => "snake",
            ObstacleKind::Plane => "plane",
            ObstacleKind::Axel => "axel",
            ObstacleKind::Octopus => "octopus",
            ObstacleKind::Ghost => "ghost",
            ObstacleKind::Car => "car",
            ObstacleKind::Train => "train",
            ObstacleKind::Hunter => "hunter",
            ObstacleKind::Dinosaur => "dinosaur",
        }
    }
}

/// A hostile entity sweeping along the lanes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    /// Colour variant, cosmetic only
    pub variant: u8,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
    pub motion: LaneMotion,
}

impl Obstacle {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: u32,
        kind: ObstacleKind,
        variant: u8,
        lanes: &LaneTable,
        lane: usize,
        x: f32,
        heading: Heading,
        bias: Bias,
        speed: f32,
    ) -> Self {
        let size = kind.size();
        let mut obstacle = Self {
            id,
            kind,
            variant,
            pos: Vec2::ZERO,
            size,
            speed,
            motion: LaneMotion::new(x, heading, lane, bias),
        };
        obstacle.sync_position(lanes);
        obstacle
    }

    #[inline]
    pub fn lane(&self) -> usize {
        self.motion.lane
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    /// Strict overlap with another box; touching edges do not count
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.bounds().overlaps(other)
    }

    /// Advance one tick and re-seat the body on its (possibly new) lane
    pub fn advance(&mut self, lanes: &LaneTable, field_width: f32) -> Option<BoundaryEvent> {
        let event = self.travel(self.speed, field_width, lanes.len());
        self.sync_position(lanes);
        event
    }

    fn sync_position(&mut self, lanes: &LaneTable) {
        self.pos = Vec2::new(self.motion.offset, lanes.y(self.motion.lane) - self.size.y);
    }
}

impl LaneTraveler for Obstacle {
    fn motion(&self) -> &LaneMotion {
        &self.motion
    }

    fn motion_mut(&mut self) -> &mut LaneMotion {
        &mut self.motion
    }

    fn sweep(&self) -> Sweep {
        Sweep {
            origin: 0.0,
            span: self.size.x,
            exit_width: self.size.x,
        }
    }
}
