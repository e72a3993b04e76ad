//! Player kinematics
//!
//! Two states: grounded and airborne. Only a jump leaves the ground; a walk
//! off into a gap falls while still grounded. Gravity is applied every tick,
//! the head check runs before the position is integrated and the landing
//! check runs after it. That ordering is load-bearing: a head bump zeroes the velocity,
//! so the landing scan that follows in the same tick only looks within the
//! bare tolerance.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Aabb, head_block, landing_lane};
use super::config::Physics;
use super::gap::GapField;
use super::lane::LaneTable;

/// What the vertical step ran into this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalContact {
    None,
    /// Head hit the underside of a solid lane
    HeadBlocked { lane: usize },
    /// Came down onto a lane (or the floor when `lane` is `None`) after being airborne
    Landed { lane: Option<usize> },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Positive is downward
    pub velocity_y: f32,
    pub airborne: bool,
}

impl Player {
    pub fn new(spawn: Vec2, size: Vec2) -> Self {
        Self {
            pos: spawn,
            size,
            velocity_y: 0.0,
            airborne: false,
        }
    }

    /// Put the player back on its spawn point at rest
    pub fn reset(&mut self, spawn: Vec2) {
        self.pos = spawn;
        self.velocity_y = 0.0;
        self.airborne = false;
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.pos.x + self.size.x / 2.0
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    /// Start a jump. Ignored while airborne (no double jump).
    pub fn jump(&mut self, jump_strength: f32) -> bool {
        if self.airborne {
            return false;
        }
        self.velocity_y = jump_strength;
        self.airborne = true;
        true
    }

    /// Step left, reappearing at the right edge once fully off the left one
    pub fn move_left(&mut self, speed: f32, field_width: f32) {
        self.pos.x -= speed;
        if self.pos.x + self.size.x < 0.0 {
            self.pos.x = field_width;
        }
    }

    /// Step right, reappearing at the left edge once past the right one
    pub fn move_right(&mut self, speed: f32, field_width: f32) {
        self.pos.x += speed;
        if self.pos.x > field_width {
            self.pos.x = -self.size.x;
        }
    }

    /// Integrate one tick of vertical motion against the lanes and floor
    pub fn step(
        &mut self,
        lanes: &LaneTable,
        gaps: &GapField,
        physics: &Physics,
        floor_y: f32,
    ) -> VerticalContact {
        let was_airborne = self.airborne;
        let center_x = self.center_x();
        let mut contact = VerticalContact::None;

        self.velocity_y += physics.gravity;

        if self.velocity_y < 0.0 {
            if let Some(lane) = head_block(lanes, gaps, self.top(), self.velocity_y, center_x) {
                self.pos.y = lanes.underside(lane);
                self.velocity_y = 0.0;
                contact = VerticalContact::HeadBlocked { lane };
            }
        }

        self.pos.y += self.velocity_y;

        let mut support = None;
        if self.velocity_y >= 0.0 {
            if let Some(lane) = landing_lane(
                lanes,
                gaps,
                self.bottom(),
                self.velocity_y,
                physics.landing_tolerance,
                center_x,
            ) {
                self.pos.y = lanes.y(lane) - self.size.y;
                self.velocity_y = 0.0;
                support = Some(Some(lane));
            }
        }
        if support.is_none() && self.bottom() >= floor_y {
            self.pos.y = floor_y - self.size.y;
            self.velocity_y = 0.0;
            support = Some(None);
        }

        // Only a jump makes the player airborne; walking off an edge does not
        if support.is_some() {
            self.airborne = false;
        }
        if let (Some(lane), true, VerticalContact::None) = (support, was_airborne, contact) {
            contact = VerticalContact::Landed { lane };
        }
        contact
    }
}
